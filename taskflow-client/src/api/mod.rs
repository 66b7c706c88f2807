//! Typed REST endpoints over an [`HttpClient`](crate::http::HttpClient)

mod auth;
mod categories;
mod tasks;

pub use auth::AuthApi;
pub use categories::CategoryApi;
pub use tasks::TaskApi;
