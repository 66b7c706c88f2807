//! Credential storage - persisted auth token and user profile
//!
//! The store is a small JSON key-value file (`auth_token`, `user`). Clones
//! share the same in-memory state so the HTTP client and the auth API see
//! each other's updates immediately.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use shared::User;

use crate::error::ClientResult;

/// Persisted credential contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Credential store
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    state: Arc<RwLock<StoredCredential>>,
}

impl CredentialStore {
    /// Store that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading existing contents.
    ///
    /// A missing file is an empty store; an unreadable one is discarded.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let stored = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable credential file {}: {}", path.display(), e);
                StoredCredential::default()
            })
        } else {
            StoredCredential::default()
        };

        Ok(Self {
            path: Some(path),
            state: Arc::new(RwLock::new(stored)),
        })
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.read().auth_token
    }

    /// Stored user profile
    pub fn user(&self) -> Option<User> {
        self.read().user
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.read().auth_token.is_some()
    }

    /// Record a successful login or registration
    pub fn set_login(&self, token: impl Into<String>, user: User) -> ClientResult<()> {
        self.update(|stored| {
            stored.auth_token = Some(token.into());
            stored.user = Some(user);
        })
    }

    /// Replace the token (refresh)
    pub fn set_token(&self, token: impl Into<String>) -> ClientResult<()> {
        self.update(|stored| stored.auth_token = Some(token.into()))
    }

    /// Replace the user profile
    pub fn set_user(&self, user: User) -> ClientResult<()> {
        self.update(|stored| stored.user = Some(user))
    }

    /// Remove token and profile (logout, 401)
    pub fn clear(&self) -> ClientResult<()> {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            *state = StoredCredential::default();
        }
        if let Some(path) = &self.path
            && path.exists()
        {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read(&self) -> StoredCredential {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update(&self, apply: impl FnOnce(&mut StoredCredential)) -> ClientResult<()> {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            apply(&mut state);
            state.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, stored: &StoredCredential) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(stored)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn user() -> User {
        User {
            id: 1,
            email: "ada@example.com".into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth").join("credential.json");

        let store = CredentialStore::open(&path).unwrap();
        assert!(!store.is_authenticated());

        store.set_login("token-1", user()).unwrap();
        assert!(path.exists());

        let reloaded = CredentialStore::open(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("token-1"));
        assert_eq!(reloaded.user().unwrap().email, "ada@example.com");
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credential.json");

        let store = CredentialStore::open(&path).unwrap();
        store.set_login("token-1", user()).unwrap();
        store.clear().unwrap();

        assert!(!path.exists());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = CredentialStore::in_memory();
        let clone = store.clone();
        store.set_token("token-2").unwrap();
        assert_eq!(clone.token().as_deref(), Some("token-2"));
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credential.json");
        fs::write(&path, "{not json").unwrap();

        let store = CredentialStore::open(&path).unwrap();
        assert!(!store.is_authenticated());
    }
}
