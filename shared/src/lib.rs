//! Shared types for the taskflow client
//!
//! Wire-level models, filters and response envelopes used by the REST
//! backend and the client crate.

pub mod client;
pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{AuthResponse, Token, User, UserCreate, UserLogin, UserUpdate};
pub use models::{Category, CategoryCreate, CategoryUpdate, Task, TaskCreate, TaskReorderRequest, TaskUpdate};
pub use request::{PageRequest, SortDirection, SortField, TaskFilters};
pub use response::{CategoryListResponse, ErrorResponse, TaskListResponse};
