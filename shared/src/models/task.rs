//! Task Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::category::Category;
use crate::util::{de_order_index, not_blank};

/// Default priority assigned by the backend when none is given
pub const DEFAULT_PRIORITY: i32 = 5;

/// Task entity
///
/// Values are replaced, never edited in place, once they leave the API
/// layer: every reorder or mutation produces fresh copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    /// 1..=10, lower is more urgent
    pub priority: i32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Position in the manual ordering
    #[serde(deserialize_with = "de_order_index")]
    pub order_index: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub user_id: i64,
    #[serde(default)]
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Copy of this task with a different `order_index`.
    pub fn with_order_index(&self, order_index: i64) -> Self {
        Self {
            order_index,
            ..self.clone()
        }
    }

    /// Whether the task is past due and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Create task payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl TaskCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: DEFAULT_PRIORITY,
            due_date: None,
            category_id: None,
        }
    }
}

/// Update task payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[validate(range(min = 1, max = 10))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

/// Bulk reorder payload: the full id sequence after a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReorderRequest {
    pub task_ids: Vec<i64>,
}
