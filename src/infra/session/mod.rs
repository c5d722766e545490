//! Persistent session storage adapters.
//!
//! A session is two key-value entries: `token` (the bearer credential) and
//! `user` (the JSON-serialized profile cache). [`FileSessionStore`] keeps
//! them in a small JSON file; [`MemorySessionStore`] backs tests and
//! ephemeral sessions; [`NullSessionStore`] is the adapter for environments
//! with no persistent storage at all, where every operation is a no-op.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use secrecy::SecretString;
use tracing::warn;

use crate::domain::{SessionStore, User};

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key for the cached profile
pub const USER_KEY: &str = "user";

/// Decode a cached profile entry.
///
/// `Err` means the entry exists but is corrupt; callers remove it so the
/// cache heals on the next profile fetch.
pub(crate) fn decode_user(raw: &str) -> Result<User, serde_json::Error> {
    serde_json::from_str(raw)
}

pub(crate) fn warn_corrupt_user(err: &serde_json::Error) {
    warn!(error = %err, "Discarding corrupt cached profile");
}

/// Session store for environments without persistent storage.
///
/// Mirrors the behavior of storage-backed code running where no storage
/// context exists: reads return `None`, writes do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSessionStore;

impl SessionStore for NullSessionStore {
    fn token(&self) -> Option<SecretString> {
        None
    }

    fn set_token(&self, _token: &SecretString) {}

    fn user(&self) -> Option<User> {
        None
    }

    fn set_user(&self, _user: &User) {}

    fn clear(&self) {}
}
