//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use shared::PageRequest;

use crate::error::ClientResult;
use crate::http::NetworkHttpClient;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "TASKFLOW_API_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client configuration for connecting to the task API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Upper bound on a reorder persistence call; expiry rolls back
    pub reorder_timeout: Duration,

    /// JSON file persisting the auth token and user profile
    pub credential_path: Option<PathBuf>,

    /// Tasks fetched per page
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            reorder_timeout: Duration::from_secs(10),
            credential_path: None,
            page_size: shared::request::DEFAULT_PAGE_SIZE,
        }
    }

    /// Configuration from `TASKFLOW_API_URL`, falling back to the default URL
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the reorder persistence timeout
    pub fn with_reorder_timeout(mut self, timeout: Duration) -> Self {
        self.reorder_timeout = timeout;
        self
    }

    /// Persist credentials to the given JSON file
    pub fn with_credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(path.into());
        self
    }

    /// Set the page size for task lists
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Page `page` of a task list at the configured page size
    pub fn page_request(&self, page: u32) -> PageRequest {
        PageRequest::new(page, self.page_size)
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::from_config(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
