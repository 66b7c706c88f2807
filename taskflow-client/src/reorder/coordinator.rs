//! Optimistic reorder coordinator
//!
//! The list state is a single tagged value:
//!
//! - `Committed(list)`: nothing in flight, `list` is what the user sees.
//! - `Pending { snapshot, speculative, generation }`: `speculative` is on
//!   screen while the request tagged `generation` resolves; `snapshot` is
//!   what the user saw right before the move.
//!
//! Transitions on [`ReorderState`] are pure. [`ReorderCoordinator`] is the
//! imperative shell around them: it issues the persistence call, pushes
//! committed orderings into the list cache and emits notices.
//!
//! Completions are matched by generation, never by arrival order. A move
//! started while another is still in flight snapshots the list currently on
//! screen and supersedes the earlier request, whose late result is dropped.

use std::collections::HashMap;
use std::time::Duration;

use shared::{Task, TaskFilters};

use super::drag::{DragSession, ItemBounds};
use super::keyboard::{KeyOutcome, KeyboardReorder, ReorderKey};
use super::ordering::{move_task, task_ids};
use super::{ReorderBackend, ReorderError};
use crate::cache::ListCacheSync;
use crate::error::{ClientError, ClientResult};
use crate::notify::{Notifier, Severity};

/// Default bound on a reorder persistence call
pub const DEFAULT_REORDER_TIMEOUT: Duration = Duration::from_secs(10);

/// How a reorder request resolved
#[derive(Debug, Clone, Copy)]
pub enum Completion<'a> {
    /// Server-confirmed tasks
    Confirmed(&'a [Task]),
    Failed,
}

/// Displayed list plus any in-flight speculative move
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderState {
    Committed(Vec<Task>),
    Pending {
        snapshot: Vec<Task>,
        speculative: Vec<Task>,
        generation: u64,
    },
}

impl Default for ReorderState {
    fn default() -> Self {
        Self::Committed(Vec::new())
    }
}

impl ReorderState {
    /// The list on screen.
    pub fn displayed(&self) -> &[Task] {
        match self {
            Self::Committed(list) => list,
            Self::Pending { speculative, .. } => speculative,
        }
    }

    /// Generation of the request the state is waiting for.
    pub fn pending_generation(&self) -> Option<u64> {
        match self {
            Self::Committed(_) => None,
            Self::Pending { generation, .. } => Some(*generation),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Speculatively move `source` to `drop` on the displayed list.
    pub fn begin(&self, source: usize, drop: usize, generation: u64) -> Result<Self, ReorderError> {
        let current = self.displayed();
        check_index(source, current.len())?;
        check_index(drop, current.len())?;
        Ok(Self::Pending {
            snapshot: current.to_vec(),
            speculative: move_task(current, source, drop),
            generation,
        })
    }

    /// Resolve the request tagged `generation`.
    ///
    /// Returns `None` when the completion is stale: nothing is pending, or
    /// a newer move superseded it.
    pub fn settle(&self, generation: u64, completion: Completion<'_>) -> Option<Self> {
        match self {
            Self::Pending {
                snapshot,
                speculative,
                generation: current,
            } if *current == generation => Some(match completion {
                Completion::Confirmed(confirmed) => Self::Committed(merge_confirmed(speculative, confirmed)),
                Completion::Failed => Self::Committed(snapshot.clone()),
            }),
            _ => None,
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<(), ReorderError> {
    if index < len {
        Ok(())
    } else {
        Err(ReorderError::IndexOutOfBounds { index, len })
    }
}

/// Merge the server's answer into the speculative list.
///
/// The server order wins when it holds exactly the speculative tasks;
/// otherwise the speculative order stays and known tasks are refreshed by
/// id. Either way `order_index` ends up equal to the position.
fn merge_confirmed(speculative: &[Task], confirmed: &[Task]) -> Vec<Task> {
    let by_id: HashMap<i64, &Task> = confirmed.iter().map(|t| (t.id, t)).collect();
    let same_members = by_id.len() == speculative.len()
        && confirmed.len() == speculative.len()
        && speculative.iter().all(|t| by_id.contains_key(&t.id));

    let sequence: Vec<&Task> = if same_members {
        confirmed.iter().collect()
    } else {
        speculative
            .iter()
            .map(|t| by_id.get(&t.id).copied().unwrap_or(t))
            .collect()
    };

    sequence
        .into_iter()
        .enumerate()
        .map(|(position, task)| task.with_order_index(position as i64))
        .collect()
}

/// An issued reorder request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderTicket {
    pub generation: u64,
    pub task_ids: Vec<i64>,
}

/// What a reorder call ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Source equals drop; nothing was sent
    Unchanged,
    /// Drag ended without a drop position
    Cancelled,
    /// Server confirmed; the new order is committed
    Committed,
    /// Request failed or timed out; the pre-move list is back on screen
    RolledBack,
    /// A newer move superseded this request; its result was ignored
    Stale,
}

/// Send a reorder request, bounded by `timeout`.
pub async fn persist<B>(backend: &B, task_ids: &[i64], timeout: Duration) -> ClientResult<Vec<Task>>
where
    B: ReorderBackend + ?Sized,
{
    tokio::time::timeout(timeout, backend.reorder_tasks(task_ids))
        .await
        .map_err(|_| ClientError::Timeout(timeout))?
}

/// Owns the displayed task list of one list view and drives reorders on it
pub struct ReorderCoordinator<B, N, C> {
    backend: B,
    notifier: N,
    cache: C,
    filters: TaskFilters,
    state: ReorderState,
    drag: DragSession,
    keyboard: KeyboardReorder,
    next_generation: u64,
    timeout: Duration,
}

impl<B, N, C> ReorderCoordinator<B, N, C>
where
    B: ReorderBackend,
    N: Notifier,
    C: ListCacheSync,
{
    /// Coordinator for the list fetched under `filters`.
    pub fn new(backend: B, notifier: N, cache: C, filters: TaskFilters, tasks: Vec<Task>) -> Self {
        Self {
            backend,
            notifier,
            cache,
            filters,
            state: ReorderState::Committed(tasks),
            drag: DragSession::Idle,
            keyboard: KeyboardReorder::new(),
            next_generation: 1,
            timeout: DEFAULT_REORDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn displayed(&self) -> &[Task] {
        self.state.displayed()
    }

    pub fn state(&self) -> &ReorderState {
        &self.state
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn keyboard(&self) -> &KeyboardReorder {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardReorder {
        &mut self.keyboard
    }

    pub fn filters(&self) -> &TaskFilters {
        &self.filters
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a reorder request is awaiting its result.
    pub fn is_reordering(&self) -> bool {
        self.state.is_pending()
    }

    /// Install freshly fetched server state. In-flight results become stale.
    pub fn replace_list(&mut self, tasks: Vec<Task>) {
        if let Some(generation) = self.state.pending_generation() {
            tracing::debug!(generation, "list replaced while reorder pending");
        }
        self.state = ReorderState::Committed(tasks);
    }

    // ========== Pointer drag ==========

    /// Start dragging the displayed task at `index`.
    pub fn start_drag(&mut self, index: usize) -> Result<(), ReorderError> {
        let displayed = self.state.displayed();
        check_index(index, displayed.len())?;
        let task = displayed[index].clone();
        self.drag.start(task, index);
        Ok(())
    }

    /// Hover over `visible_index` of the list with the dragged task hidden.
    pub fn hover(&mut self, visible_index: usize, pointer_y: f64, bounds: ItemBounds) -> Result<usize, ReorderError> {
        if !self.drag.is_dragging() {
            return Err(ReorderError::NotDragging);
        }
        let visible_len = self.state.displayed().len().saturating_sub(1);
        check_index(visible_index, visible_len)?;
        self.drag.hover(visible_index, pointer_y, bounds)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Drop at the current candidate; without one the drag is cancelled.
    pub async fn finish_drag(&mut self) -> Result<ReorderOutcome, ReorderError> {
        let (Some(source), candidate) = (self.drag.source_index(), self.drag.candidate()) else {
            return Err(ReorderError::NotDragging);
        };
        match candidate {
            Some(drop) => self.reorder(source, drop).await,
            None => {
                self.drag.cancel();
                Ok(ReorderOutcome::Cancelled)
            }
        }
    }

    // ========== Keyboard ==========

    /// Feed a key for the item at `active_index`; a confirmed move runs
    /// through [`reorder`](Self::reorder).
    pub async fn handle_key(&mut self, key: ReorderKey, active_index: usize) -> Result<KeyOutcome, ReorderError> {
        let len = self.state.displayed().len();
        let outcome = self.keyboard.handle_key(key, active_index, len);
        if let Some(action) = outcome.action {
            let result = self.reorder(action.source, action.drop).await;
            self.keyboard.finish();
            result?;
        }
        Ok(outcome)
    }

    // ========== Reorder ==========

    /// Move `source` to `drop`: display the result immediately, persist it,
    /// then commit or roll back. The drag session ends either way.
    ///
    /// Persistence failures are not errors here; they roll back, notify
    /// and report [`ReorderOutcome::RolledBack`].
    pub async fn reorder(&mut self, source: usize, drop: usize) -> Result<ReorderOutcome, ReorderError> {
        let Some(ticket) = self.begin_reorder(source, drop)? else {
            return Ok(ReorderOutcome::Unchanged);
        };
        let result = persist(&self.backend, &ticket.task_ids, self.timeout).await;
        Ok(self.complete_reorder(ticket.generation, result))
    }

    /// First half of [`reorder`](Self::reorder) for callers that send the
    /// request themselves. `None` means nothing moved and nothing must be
    /// sent.
    pub fn begin_reorder(&mut self, source: usize, drop: usize) -> Result<Option<ReorderTicket>, ReorderError> {
        let len = self.state.displayed().len();
        check_index(source, len)?;
        check_index(drop, len)?;

        if source == drop {
            self.drag.end();
            return Ok(None);
        }

        let generation = self.next_generation;
        let next = self.state.begin(source, drop, generation)?;
        if let Some(superseded) = self.state.pending_generation() {
            tracing::debug!(superseded, generation, "reorder superseded");
        }
        self.next_generation += 1;
        self.state = next;

        let ticket = ReorderTicket {
            generation,
            task_ids: task_ids(self.state.displayed()),
        };
        tracing::debug!(generation, source, drop, "reorder started");
        Ok(Some(ticket))
    }

    /// Second half of [`reorder`](Self::reorder): apply the result of the
    /// request tagged `generation`.
    pub fn complete_reorder(&mut self, generation: u64, result: ClientResult<Vec<Task>>) -> ReorderOutcome {
        let completion = match &result {
            Ok(confirmed) => Completion::Confirmed(confirmed),
            Err(_) => Completion::Failed,
        };

        let Some(next) = self.state.settle(generation, completion) else {
            match &result {
                Ok(_) => tracing::warn!(generation, "ignoring stale reorder success"),
                Err(e) => tracing::warn!(generation, error = %e, "ignoring stale reorder failure"),
            }
            return ReorderOutcome::Stale;
        };

        self.state = next;
        self.drag.end();

        match result {
            Ok(_) => {
                self.cache.commit_order(&self.filters, self.state.displayed());
                tracing::info!(generation, tasks = self.state.displayed().len(), "reorder committed");
                self.notifier.notify(
                    Severity::Success,
                    "Tasks reordered",
                    "Your tasks have been successfully reordered.",
                );
                ReorderOutcome::Committed
            }
            Err(e) => {
                tracing::error!(generation, error = %e, "Failed to reorder tasks");
                self.notifier.notify(
                    Severity::Error,
                    "Reorder failed",
                    "Failed to reorder tasks. Please try again.",
                );
                ReorderOutcome::RolledBack
            }
        }
    }
}
