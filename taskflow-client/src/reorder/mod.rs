//! Optimistic drag-and-drop reordering
//!
//! - [`ordering`]: pure single-element move with `order_index` rewrite
//! - [`drag`]: pointer drag session
//! - [`keyboard`]: keyboard access to the same moves
//! - [`coordinator`]: speculative display, persistence, commit or rollback

pub mod coordinator;
pub mod drag;
pub mod keyboard;
pub mod ordering;

use async_trait::async_trait;
use shared::Task;
use thiserror::Error;

use crate::error::ClientResult;

pub use coordinator::{Completion, ReorderCoordinator, ReorderOutcome, ReorderState, ReorderTicket};
pub use drag::{DragSession, DropPlacement, ItemBounds};
pub use keyboard::{KeyOutcome, KeyboardMove, KeyboardReorder, ReorderKey};
pub use ordering::{affected_span, move_task, task_ids};

/// Contract violations in the reorder path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("index {index} out of bounds for list of {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("no drag in progress")]
    NotDragging,
}

/// Persists a manual ordering
///
/// Receives the full id sequence after a move and answers with the
/// server-confirmed tasks. Submitting the same sequence twice must leave
/// the same end state.
#[async_trait]
pub trait ReorderBackend: Send + Sync {
    async fn reorder_tasks(&self, task_ids: &[i64]) -> ClientResult<Vec<Task>>;
}
