//! In-memory session store.

use std::collections::HashMap;
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::domain::{SessionStore, User};

use super::{TOKEN_KEY, USER_KEY, decode_user, warn_corrupt_user};

/// Session store holding its entries in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a raw entry. Test hook for exercising corrupt-cache paths.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<SecretString> {
        self.entries
            .lock()
            .unwrap()
            .get(TOKEN_KEY)
            .map(|t| SecretString::from(t.as_str()))
    }

    fn set_token(&self, token: &SecretString) {
        self.entries
            .lock()
            .unwrap()
            .insert(TOKEN_KEY.to_string(), token.expose_secret().to_string());
    }

    fn user(&self) -> Option<User> {
        let mut entries = self.entries.lock().unwrap();
        let raw = entries.get(USER_KEY)?;
        match decode_user(raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn_corrupt_user(&err);
                entries.remove(USER_KEY);
                None
            }
        }
    }

    fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                self.entries
                    .lock()
                    .unwrap()
                    .insert(USER_KEY.to_string(), raw);
            }
            Err(err) => warn!(error = %err, "Failed to serialize profile for caching"),
        }
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
    }
}
