//! Request types for the shared crate
//!
//! Filter, sort and pagination parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// Default number of tasks per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum page size accepted by the backend
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Sort field for task lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Priority,
    CreatedAt,
    DueDate,
    #[default]
    OrderIndex,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Priority => "priority",
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
            Self::OrderIndex => "order_index",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Task list filters
///
/// Also the identity of a cached list view, hence `Eq + Hash`.
/// Dates are `YYYY-MM-DD` strings, passed through as the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortDirection>,
}

impl TaskFilters {
    /// Whether no filter narrows the list (sorting aside).
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none()
            && self.completed.is_none()
            && self.category_id.is_none()
            && self.priority.is_none()
            && self.due_date_from.is_none()
            && self.due_date_to.is_none()
    }

    /// Whether the list is displayed in manual order, the only order a
    /// drag reorder makes sense for.
    pub fn is_manual_order(&self) -> bool {
        self.sort_by.unwrap_or_default() == SortField::OrderIndex
            && self.sort_order.unwrap_or_default() == SortDirection::Asc
    }

    /// Query pairs for `GET /tasks/`, including `skip`/`limit`.
    ///
    /// Empty search strings are dropped.
    pub fn to_query(&self, page: &PageRequest) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(completed) = self.completed {
            params.push(("completed", completed.to_string()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("category_id", category_id.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.to_string()));
        }
        if let Some(from) = &self.due_date_from {
            params.push(("due_date_from", from.clone()));
        }
        if let Some(to) = &self.due_date_to {
            params.push(("due_date_to", to.clone()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.as_str().to_string()));
        }
        if let Some(sort_order) = self.sort_order {
            params.push(("sort_order", sort_order.as_str().to_string()));
        }
        params.push(("skip", page.skip().to_string()));
        params.push(("limit", page.limit().to_string()));
        params
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Offset sent as `skip`
    pub fn skip(&self) -> u64 {
        self.page as u64 * self.limit() as u64
    }

    /// Limit clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}
