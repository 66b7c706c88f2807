//! Data models
//!
//! Shared between the REST backend payloads and the client.
//! All IDs are `i64`.

pub mod category;
pub mod task;

// Re-exports
pub use category::*;
pub use task::*;
