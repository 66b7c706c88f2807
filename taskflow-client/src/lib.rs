//! Taskflow Client - HTTP client for the Taskflow API
//!
//! Typed REST calls, a stale-while-revalidate list cache and optimistic
//! drag-and-drop reordering of task lists.

pub mod api;
pub mod cache;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod logger;
pub mod notify;
pub mod reorder;

pub use api::{AuthApi, CategoryApi, TaskApi};
pub use cache::{ListCache, ListCacheSync, SharedListCache, TaskListKey};
pub use config::ClientConfig;
pub use credential::{CredentialStore, StoredCredential};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use logger::init_logger;
pub use notify::{Notice, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use reorder::{
    DragSession, ItemBounds, KeyOutcome, KeyboardReorder, ReorderBackend, ReorderCoordinator, ReorderError,
    ReorderKey, ReorderOutcome, ReorderState,
};

// Re-export shared types for convenience
pub use shared::{Category, PageRequest, Task, TaskFilters, TaskListResponse};
