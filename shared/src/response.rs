//! API Response types
//!
//! List envelopes and the error body returned by the backend.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Task};

/// Paginated task list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl TaskListResponse {
    /// Whether more pages follow the current one.
    pub fn has_more(&self) -> bool {
        (self.page as u64 + 1) * (self.size as u64) < self.total
    }
}

/// Paginated category list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default)]
    pub categories: Vec<Category>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

/// Error body: `{"detail": "..."}`
///
/// Validation failures carry a list of field errors instead of a string,
/// so `detail` is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    /// Human readable message extracted from `detail`.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
