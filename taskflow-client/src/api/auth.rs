//! Auth endpoints
//!
//! Successful login/registration persist the token and profile in the
//! shared [`CredentialStore`](crate::credential::CredentialStore).

use shared::{AuthResponse, Token, User, UserCreate, UserLogin, UserUpdate};
use validator::Validate;

use crate::error::ClientResult;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct AuthApi<H> {
    http: H,
}

impl<H: HttpClient> AuthApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub async fn register(&self, payload: &UserCreate) -> ClientResult<AuthResponse> {
        payload.validate()?;
        let auth: AuthResponse = self.http.post("auth/register", payload).await?;
        self.http
            .credentials()
            .set_login(auth.token.access_token.clone(), auth.user.clone())?;
        tracing::info!(user_id = auth.user.id, "registered");
        Ok(auth)
    }

    pub async fn login(&self, payload: &UserLogin) -> ClientResult<AuthResponse> {
        payload.validate()?;
        let auth: AuthResponse = self.http.post("auth/login", payload).await?;
        self.http
            .credentials()
            .set_login(auth.token.access_token.clone(), auth.user.clone())?;
        tracing::info!(user_id = auth.user.id, "logged in");
        Ok(auth)
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.http.get("auth/me").await
    }

    pub async fn update_me(&self, payload: &UserUpdate) -> ClientResult<User> {
        payload.validate()?;
        let user: User = self.http.put("auth/me", payload).await?;
        self.http.credentials().set_user(user.clone())?;
        Ok(user)
    }

    pub async fn refresh(&self) -> ClientResult<Token> {
        let token: Token = self.http.post_empty("auth/refresh").await?;
        self.http.credentials().set_token(token.access_token.clone())?;
        Ok(token)
    }

    /// Local only: the backend keeps no session state.
    pub fn logout(&self) -> ClientResult<()> {
        self.http.credentials().clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.credentials().is_authenticated()
    }

    pub fn stored_user(&self) -> Option<User> {
        self.http.credentials().user()
    }
}
