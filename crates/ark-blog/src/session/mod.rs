//! Session state
//!
//! The bearer token and user id live in a [`SessionStore`] under the keys
//! [`AUTH_TOKEN_KEY`] and [`USER_ID_KEY`]. A missing token means "not logged in".

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;

mod file;
mod memory;

pub use file::{FileSessionStore, SESSION_FILE_NAME};
pub use memory::MemorySessionStore;

/// Key of the bearer token
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Key of the logged in user's id
pub const USER_ID_KEY: &str = "user_id";

/// Key/value persistence for session slots
pub trait SessionStore: Send + Sync + Debug {
    /// Read a slot
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Clear a slot, a no-op when absent
    fn remove(&self, key: &str) -> Result<()>;
}

/// Session context shared by the services
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Session over `store`
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Session kept in memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Stored bearer token, empty values count as absent
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.store.get(AUTH_TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    /// Store the bearer token
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(AUTH_TOKEN_KEY, token)
    }

    /// Stored user id, empty values count as absent
    pub fn user_id(&self) -> Result<Option<String>> {
        Ok(self.store.get(USER_ID_KEY)?.filter(|id| !id.is_empty()))
    }

    /// Store the user id
    pub fn set_user_id(&self, user_id: &str) -> Result<()> {
        self.store.set(USER_ID_KEY, user_id)
    }

    /// Clear token and user id
    pub fn logout(&self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        self.store.remove(USER_ID_KEY)
    }

    /// True when a non-empty token is stored
    ///
    /// A failing store reads as logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.token() {
            Ok(token) => token.is_some(),
            Err(err) => {
                tracing::warn!("Could not read session token: {}", err);
                false
            }
        }
    }

    /// `Authorization` header value for the stored token
    pub fn bearer(&self) -> Option<String> {
        match self.token() {
            Ok(token) => token.map(|t| format!("Bearer {}", t)),
            Err(err) => {
                tracing::warn!("Could not read session token: {}", err);
                None
            }
        }
    }
}
