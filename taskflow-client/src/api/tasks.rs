//! Task endpoints
//!
//! Mutations settle into the attached [`SharedListCache`] the same way for
//! every caller: create inserts at the front, update/toggle replace by id,
//! delete removes by id.

use async_trait::async_trait;
use shared::{PageRequest, Task, TaskCreate, TaskFilters, TaskListResponse, TaskReorderRequest, TaskUpdate};
use validator::Validate;

use crate::cache::{SharedListCache, TaskListKey};
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::reorder::ReorderBackend;

/// Typed access to `/tasks`
#[derive(Debug, Clone)]
pub struct TaskApi<H> {
    http: H,
    cache: Option<SharedListCache>,
}

impl<H: HttpClient> TaskApi<H> {
    pub fn new(http: H) -> Self {
        Self { http, cache: None }
    }

    /// Keep the given cache in sync with every successful call
    pub fn with_cache(mut self, cache: SharedListCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn cache(&self) -> Option<&SharedListCache> {
        self.cache.as_ref()
    }

    /// List tasks, served from the cache while the cached page is fresh.
    pub async fn list(&self, filters: &TaskFilters, page: PageRequest) -> ClientResult<TaskListResponse> {
        let key = TaskListKey::new(filters.clone(), page);
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get_list(&key)) {
            tracing::debug!(?key, "task list served from cache");
            return Ok(cached);
        }
        self.fetch_list(filters, page).await
    }

    /// List tasks from the server, bypassing and then refreshing the cache.
    pub async fn fetch_list(&self, filters: &TaskFilters, page: PageRequest) -> ClientResult<TaskListResponse> {
        let query = filters.to_query(&page);
        let response: TaskListResponse = self.http.get_with_query("tasks/", &query).await?;
        if let Some(cache) = &self.cache {
            cache.store_list(TaskListKey::new(filters.clone(), page), response.clone());
        }
        Ok(response)
    }

    pub async fn get(&self, id: i64) -> ClientResult<Task> {
        if let Some(task) = self.cache.as_ref().and_then(|c| c.get_detail(id)) {
            return Ok(task);
        }
        let task: Task = self.http.get(&format!("tasks/{id}")).await?;
        if let Some(cache) = &self.cache {
            cache.store_detail(task.clone());
        }
        Ok(task)
    }

    pub async fn create(&self, payload: &TaskCreate) -> ClientResult<Task> {
        payload.validate()?;
        let task: Task = self.http.post("tasks/", payload).await?;
        tracing::info!(task_id = task.id, "task created");
        if let Some(cache) = &self.cache {
            cache.insert_created(task.clone());
        }
        Ok(task)
    }

    pub async fn update(&self, id: i64, payload: &TaskUpdate) -> ClientResult<Task> {
        payload.validate()?;
        let task: Task = self.http.put(&format!("tasks/{id}"), payload).await?;
        if let Some(cache) = &self.cache {
            cache.replace_updated(task.clone());
        }
        Ok(task)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("tasks/{id}")).await?;
        tracing::info!(task_id = id, "task deleted");
        if let Some(cache) = &self.cache {
            cache.remove_deleted(id);
        }
        Ok(())
    }

    pub async fn toggle(&self, id: i64) -> ClientResult<Task> {
        let task: Task = self.http.patch_empty(&format!("tasks/{id}/toggle")).await?;
        if let Some(cache) = &self.cache {
            cache.replace_toggled(task.clone());
        }
        Ok(task)
    }

    /// Persist a full manual ordering. The cache is left to the caller,
    /// which decides whether the result is still current.
    pub async fn reorder(&self, task_ids: &[i64]) -> ClientResult<Vec<Task>> {
        let body = TaskReorderRequest {
            task_ids: task_ids.to_vec(),
        };
        self.http.patch("tasks/reorder", &body).await
    }

    pub async fn overdue(&self) -> ClientResult<Vec<Task>> {
        self.http.get("tasks/overdue").await
    }

    pub async fn due_today(&self) -> ClientResult<Vec<Task>> {
        self.http.get("tasks/due-today").await
    }

    pub async fn high_priority(&self) -> ClientResult<Vec<Task>> {
        self.http.get("tasks/high-priority").await
    }
}

#[async_trait]
impl<H: HttpClient> ReorderBackend for TaskApi<H> {
    async fn reorder_tasks(&self, task_ids: &[i64]) -> ClientResult<Vec<Task>> {
        self.reorder(task_ids).await
    }
}
