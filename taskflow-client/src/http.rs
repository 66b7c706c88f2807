//! HTTP client for network-based API calls

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ErrorResponse;

use crate::credential::CredentialStore;
use crate::{ClientConfig, ClientError, ClientResult};

/// Query string pairs
pub type Query = [(&'static str, String)];

/// HTTP transport used by the typed APIs
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn delete(&self, path: &str) -> ClientResult<()>;
    fn credentials(&self) -> &CredentialStore;
}

/// Network HTTP client
///
/// Every request carries `Authorization: Bearer <token>` when the
/// credential store holds a token. A 401 response clears the store.
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl NetworkHttpClient {
    /// Create a client with an in-memory credential store
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let credentials = match &config.credential_path {
            Some(path) => CredentialStore::open(path)?,
            None => CredentialStore::in_memory(),
        };
        if let Some(token) = &config.token {
            credentials.set_token(token.clone())?;
        }
        Self::with_credentials(config, credentials)
    }

    /// Create a client sharing an existing credential store
    pub fn with_credentials(config: &ClientConfig, credentials: CredentialStore) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "request");
        let mut req = self.client.request(method, url);
        if let Some(token) = self.credentials.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.message())
            .unwrap_or(text);

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Request rejected with 401, clearing stored credentials");
                self.credentials.clear()?;
                Err(ClientError::Unauthorized)
            }
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            StatusCode::CONFLICT => Err(ClientError::Conflict(message)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(ClientError::Validation(message)),
            _ => Err(ClientError::Internal(format!("{status}: {message}"))),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = self.send(req).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T> {
        self.send_json(self.request(Method::GET, path).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send_json(self.request(Method::PUT, path).json(body)).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send_json(self.request(Method::PATCH, path).json(body)).await
    }

    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(self.request(Method::PATCH, path)).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}
