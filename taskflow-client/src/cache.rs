//! List cache - cached task lists and details kept consistent across views
//!
//! Every settled mutation is merged into the cached views instead of
//! triggering a refetch:
//!
//! | operation | lists                         | detail        |
//! |-----------|-------------------------------|---------------|
//! | reorder   | replace sequence (same filters) | refresh by id |
//! | create    | insert at front, `total += 1` | store         |
//! | update    | replace by id                 | store         |
//! | toggle    | replace by id                 | store         |
//! | delete    | remove by id, `total -= 1`    | drop          |

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use shared::{Category, PageRequest, Task, TaskFilters, TaskListResponse};
use tokio::time::Instant;

/// Lists are considered fresh for this long after a fetch
pub const LIST_STALE_AFTER: Duration = Duration::from_secs(30);

/// Details are considered fresh for this long after a fetch
pub const DETAIL_STALE_AFTER: Duration = Duration::from_secs(60);

/// Receives committed orderings from the reorder coordinator.
///
/// Implementations must be idempotent: committing the same sequence twice
/// leaves the same state.
pub trait ListCacheSync: Send + Sync {
    fn commit_order(&self, filters: &TaskFilters, tasks: &[Task]);
}

/// Identity of a cached list view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskListKey {
    pub filters: TaskFilters,
    pub page: PageRequest,
}

impl TaskListKey {
    pub fn new(filters: TaskFilters, page: PageRequest) -> Self {
        Self { filters, page }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at: Instant,
    invalidated: bool,
}

impl<T> Entry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
            invalidated: false,
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.invalidated && self.fetched_at.elapsed() < ttl
    }
}

/// In-memory cache of task lists, task details and categories
#[derive(Debug)]
pub struct ListCache {
    lists: HashMap<TaskListKey, Entry<TaskListResponse>>,
    details: HashMap<i64, Entry<Task>>,
    categories: Option<Entry<Vec<Category>>>,
    list_ttl: Duration,
    detail_ttl: Duration,
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new(LIST_STALE_AFTER, DETAIL_STALE_AFTER)
    }
}

impl ListCache {
    pub fn new(list_ttl: Duration, detail_ttl: Duration) -> Self {
        Self {
            lists: HashMap::new(),
            details: HashMap::new(),
            categories: None,
            list_ttl,
            detail_ttl,
        }
    }

    // ========== Reads ==========

    /// Fresh cached page
    pub fn get_list(&self, key: &TaskListKey) -> Option<&TaskListResponse> {
        self.lists
            .get(key)
            .filter(|e| e.is_fresh(self.list_ttl))
            .map(|e| &e.value)
    }

    /// Cached page regardless of freshness
    pub fn peek_list(&self, key: &TaskListKey) -> Option<&TaskListResponse> {
        self.lists.get(key).map(|e| &e.value)
    }

    pub fn get_detail(&self, id: i64) -> Option<&Task> {
        self.details
            .get(&id)
            .filter(|e| e.is_fresh(self.detail_ttl))
            .map(|e| &e.value)
    }

    pub fn get_categories(&self) -> Option<&[Category]> {
        self.categories
            .as_ref()
            .filter(|e| e.is_fresh(self.list_ttl))
            .map(|e| e.value.as_slice())
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    // ========== Fetch results ==========

    pub fn store_list(&mut self, key: TaskListKey, response: TaskListResponse) {
        self.lists.insert(key, Entry::new(response));
    }

    pub fn store_detail(&mut self, task: Task) {
        self.details.insert(task.id, Entry::new(task));
    }

    pub fn store_categories(&mut self, categories: Vec<Category>) {
        self.categories = Some(Entry::new(categories));
    }

    // ========== Mutation results ==========

    /// Replace the sequence of every page cached under `filters`.
    pub fn commit_order(&mut self, filters: &TaskFilters, tasks: &[Task]) {
        let mut pages = 0;
        for (key, entry) in self.lists.iter_mut() {
            if &key.filters == filters {
                entry.value.tasks = tasks.to_vec();
                pages += 1;
            }
        }
        for task in tasks {
            if let Some(entry) = self.details.get_mut(&task.id) {
                entry.value = task.clone();
            }
        }
        tracing::debug!(pages, tasks = tasks.len(), "order committed to cache");
    }

    pub fn insert_created(&mut self, task: Task) {
        for entry in self.lists.values_mut() {
            entry.value.tasks.insert(0, task.clone());
            entry.value.total += 1;
        }
        self.store_detail(task);
    }

    pub fn replace_updated(&mut self, task: Task) {
        for entry in self.lists.values_mut() {
            if let Some(slot) = entry.value.tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = task.clone();
            }
        }
        self.store_detail(task);
    }

    /// Toggle results merge exactly like updates.
    pub fn replace_toggled(&mut self, task: Task) {
        self.replace_updated(task);
    }

    /// Remove a task everywhere; totals drop only on pages that held it.
    pub fn remove_deleted(&mut self, id: i64) {
        for entry in self.lists.values_mut() {
            let before = entry.value.tasks.len();
            entry.value.tasks.retain(|t| t.id != id);
            if entry.value.tasks.len() < before {
                entry.value.total = entry.value.total.saturating_sub(1);
            }
        }
        self.details.remove(&id);
    }

    pub fn upsert_category(&mut self, category: Category) {
        if let Some(entry) = &mut self.categories {
            match entry.value.iter_mut().find(|c| c.id == category.id) {
                Some(slot) => *slot = category,
                None => entry.value.push(category),
            }
        }
    }

    /// Drop a category and detach it from cached tasks.
    pub fn remove_category(&mut self, id: i64) {
        if let Some(entry) = &mut self.categories {
            entry.value.retain(|c| c.id != id);
        }
        let detach = |task: &mut Task| {
            if task.category_id == Some(id) {
                task.category_id = None;
                task.category = None;
            }
        };
        for entry in self.lists.values_mut() {
            entry.value.tasks.iter_mut().for_each(detach);
        }
        for entry in self.details.values_mut() {
            detach(&mut entry.value);
        }
    }

    // ========== Invalidation ==========

    /// Mark every list stale; the next read refetches.
    pub fn invalidate_lists(&mut self) {
        for entry in self.lists.values_mut() {
            entry.invalidated = true;
        }
    }

    pub fn clear(&mut self) {
        self.lists.clear();
        self.details.clear();
        self.categories = None;
    }
}

/// Shared handle to a [`ListCache`]
///
/// Locks are never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedListCache {
    inner: Arc<RwLock<ListCache>>,
}

impl SharedListCache {
    pub fn new(cache: ListCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Run a closure with read access
    pub fn read<R>(&self, f: impl FnOnce(&ListCache) -> R) -> R {
        f(&self.inner.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Run a closure with write access
    pub fn write<R>(&self, f: impl FnOnce(&mut ListCache) -> R) -> R {
        f(&mut self.inner.write().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn get_list(&self, key: &TaskListKey) -> Option<TaskListResponse> {
        self.read(|c| c.get_list(key).cloned())
    }

    pub fn get_detail(&self, id: i64) -> Option<Task> {
        self.read(|c| c.get_detail(id).cloned())
    }

    pub fn get_categories(&self) -> Option<Vec<Category>> {
        self.read(|c| c.get_categories().map(<[Category]>::to_vec))
    }

    pub fn store_list(&self, key: TaskListKey, response: TaskListResponse) {
        self.write(|c| c.store_list(key, response));
    }

    pub fn store_detail(&self, task: Task) {
        self.write(|c| c.store_detail(task));
    }

    pub fn store_categories(&self, categories: Vec<Category>) {
        self.write(|c| c.store_categories(categories));
    }

    pub fn insert_created(&self, task: Task) {
        self.write(|c| c.insert_created(task));
    }

    pub fn replace_updated(&self, task: Task) {
        self.write(|c| c.replace_updated(task));
    }

    pub fn replace_toggled(&self, task: Task) {
        self.write(|c| c.replace_toggled(task));
    }

    pub fn remove_deleted(&self, id: i64) {
        self.write(|c| c.remove_deleted(id));
    }

    pub fn upsert_category(&self, category: Category) {
        self.write(|c| c.upsert_category(category));
    }

    pub fn remove_category(&self, id: i64) {
        self.write(|c| c.remove_category(id));
    }

    pub fn invalidate_lists(&self) {
        self.write(ListCache::invalidate_lists);
    }

    pub fn clear(&self) {
        self.write(ListCache::clear);
    }
}

impl ListCacheSync for SharedListCache {
    fn commit_order(&self, filters: &TaskFilters, tasks: &[Task]) {
        self.write(|c| c.commit_order(filters, tasks));
    }
}
