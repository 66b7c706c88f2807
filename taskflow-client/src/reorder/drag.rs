//! Pointer drag session
//!
//! `Idle` until a drag starts; while `Dragging`, only the latest candidate
//! drop position is kept. Hover positions are indices into the *visible*
//! list, where the dragged task is hidden, so a candidate is directly the
//! task's final position after the move.

use shared::Task;

use super::ReorderError;

/// Vertical geometry of a hovered item at the time of the hover event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    pub top: f64,
    pub height: f64,
}

impl ItemBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Whether `pointer_y` lies strictly below the item's midline.
    pub fn in_lower_half(&self, pointer_y: f64) -> bool {
        pointer_y > self.top + self.height / 2.0
    }
}

/// Where a drop lands relative to the hovered item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlacement {
    At,
    After,
}

impl DropPlacement {
    pub fn from_pointer(pointer_y: f64, bounds: ItemBounds) -> Self {
        if bounds.in_lower_half(pointer_y) {
            Self::After
        } else {
            Self::At
        }
    }

    /// Candidate drop index for the hovered visible index.
    pub fn candidate(self, hovered_index: usize) -> usize {
        match self {
            Self::At => hovered_index,
            Self::After => hovered_index + 1,
        }
    }
}

/// Drag session state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        task: Task,
        source_index: usize,
        candidate: Option<usize>,
    },
}

impl DragSession {
    /// Begin dragging `task` from `source_index`. Replaces any running drag.
    pub fn start(&mut self, task: Task, source_index: usize) {
        tracing::debug!(task_id = task.id, source_index, "drag started");
        *self = Self::Dragging {
            task,
            source_index,
            candidate: None,
        };
    }

    /// Overwrite the candidate drop index.
    pub fn update_candidate(&mut self, index: usize) -> Result<(), ReorderError> {
        match self {
            Self::Dragging { candidate, .. } => {
                *candidate = Some(index);
                Ok(())
            }
            Self::Idle => Err(ReorderError::NotDragging),
        }
    }

    /// Apply the lower-half tie-break for a hover over `hovered_index` and
    /// record the resulting candidate.
    pub fn hover(&mut self, hovered_index: usize, pointer_y: f64, bounds: ItemBounds) -> Result<usize, ReorderError> {
        let candidate = DropPlacement::from_pointer(pointer_y, bounds).candidate(hovered_index);
        self.update_candidate(candidate)?;
        Ok(candidate)
    }

    /// Return to `Idle`; no-op when already idle.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }

    /// End without a drop.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            tracing::debug!("drag cancelled");
        }
        self.end();
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<&Task> {
        match self {
            Self::Dragging { task, .. } => Some(task),
            Self::Idle => None,
        }
    }

    pub fn source_index(&self) -> Option<usize> {
        match self {
            Self::Dragging { source_index, .. } => Some(*source_index),
            Self::Idle => None,
        }
    }

    pub fn candidate(&self) -> Option<usize> {
        match self {
            Self::Dragging { candidate, .. } => *candidate,
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            completed: false,
            priority: 5,
            due_date: None,
            order_index: id,
            category_id: None,
            user_id: 1,
            category: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_start_records_source_without_candidate() {
        let mut drag = DragSession::default();
        drag.start(task(1), 0);

        assert!(drag.is_dragging());
        assert_eq!(drag.dragged().map(|t| t.id), Some(1));
        assert_eq!(drag.source_index(), Some(0));
        assert_eq!(drag.candidate(), None);
    }

    #[test]
    fn test_latest_candidate_wins() {
        let mut drag = DragSession::default();
        drag.start(task(1), 0);
        for index in [1, 2, 1, 2, 2] {
            drag.update_candidate(index).unwrap();
        }
        assert_eq!(drag.candidate(), Some(2));
    }

    #[test]
    fn test_update_while_idle_is_an_error() {
        let mut drag = DragSession::default();
        assert_eq!(drag.update_candidate(1), Err(ReorderError::NotDragging));
        assert!(drag.hover(0, 5.0, ItemBounds::new(0.0, 10.0)).is_err());
    }

    #[test]
    fn test_hover_tie_break() {
        let mut drag = DragSession::default();
        drag.start(task(1), 0);
        let bounds = ItemBounds::new(100.0, 40.0);

        assert_eq!(drag.hover(1, 110.0, bounds), Ok(1));
        assert_eq!(drag.hover(1, 120.0, bounds), Ok(1));
        assert_eq!(drag.hover(1, 121.0, bounds), Ok(2));
        assert_eq!(drag.candidate(), Some(2));
    }

    #[test]
    fn test_end_and_cancel_return_to_idle() {
        let mut drag = DragSession::default();
        drag.end();
        assert_eq!(drag, DragSession::Idle);

        drag.start(task(1), 2);
        drag.update_candidate(0).unwrap();
        drag.cancel();
        assert_eq!(drag, DragSession::Idle);
        assert_eq!(drag.candidate(), None);
    }
}
