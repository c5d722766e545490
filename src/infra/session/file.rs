//! File-backed session store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::domain::{SessionStore, User};

use super::{TOKEN_KEY, USER_KEY, decode_user, warn_corrupt_user};

/// Environment variable overriding the session file location
pub const SESSION_FILE_ENV: &str = "WALLET_SESSION_FILE";

/// Session store persisting its entries to a JSON file.
///
/// The file holds a flat string-to-string map; the cached profile is kept
/// JSON-serialized inside its entry. Write failures are logged and
/// swallowed so session bookkeeping never takes the caller down.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file starts an empty session; an unreadable or corrupt
    /// file is discarded with a warning.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Resolve the session file from the environment.
    ///
    /// Uses `WALLET_SESSION_FILE` when set, otherwise
    /// `$HOME/.carteira/session.json`. Returns `None` when neither is
    /// available; callers should fall back to a
    /// [`NullSessionStore`](super::NullSessionStore).
    #[must_use]
    pub fn discover() -> Option<Self> {
        let path = std::env::var(SESSION_FILE_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .filter(|h| !h.is_empty())
                    .map(|home| Path::new(&home).join(".carteira").join("session.json"))
            })?;
        Some(Self::open(path))
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent()
            && let Err(err) = std::fs::create_dir_all(parent)
        {
            warn!(path = %self.path.display(), error = %err, "Failed to create session directory");
            return;
        }

        let serialized = match serde_json::to_string_pretty(entries) {
            Ok(s) => s,
            Err(err) => {
                warn!(error = %err, "Failed to serialize session entries");
                return;
            }
        };

        if let Err(err) = std::fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), error = %err, "Failed to write session file");
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No session file yet");
            return HashMap::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to read session file");
            return HashMap::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Discarding corrupt session file");
            HashMap::new()
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<SecretString> {
        self.entries
            .lock()
            .unwrap()
            .get(TOKEN_KEY)
            .map(|t| SecretString::from(t.as_str()))
    }

    fn set_token(&self, token: &SecretString) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(TOKEN_KEY.to_string(), token.expose_secret().to_string());
        self.persist(&entries);
    }

    fn user(&self) -> Option<User> {
        let mut entries = self.entries.lock().unwrap();
        let raw = entries.get(USER_KEY)?;
        match decode_user(raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn_corrupt_user(&err);
                entries.remove(USER_KEY);
                self.persist(&entries);
                None
            }
        }
    }

    fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                let mut entries = self.entries.lock().unwrap();
                entries.insert(USER_KEY.to_string(), raw);
                self.persist(&entries);
            }
            Err(err) => warn!(error = %err, "Failed to serialize profile for caching"),
        }
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        self.persist(&entries);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{Amount, UserWallet};

    fn temp_session_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("carteira-test-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            name: "João".to_string(),
            email: "joao@example.com".to_string(),
            cpf: "52998224725".to_string(),
            wallet: UserWallet {
                id: "w1".to_string(),
                balance: Amount::from_centavos(10_000),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_survives_reopen() {
        let path = temp_session_path();

        let store = FileSessionStore::open(&path);
        store.set_token(&SecretString::from("tok_123"));
        store.set_user(&sample_user());

        let reopened = FileSessionStore::open(&path);
        assert_eq!(reopened.token().unwrap().expose_secret(), "tok_123");
        assert_eq!(reopened.user().unwrap(), sample_user());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_clear_persists() {
        let path = temp_session_path();

        let store = FileSessionStore::open(&path);
        store.set_token(&SecretString::from("tok_123"));
        store.clear();

        let reopened = FileSessionStore::open(&path);
        assert!(reopened.token().is_none());
        assert!(reopened.user().is_none());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = temp_session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{broken").unwrap();

        let store = FileSessionStore::open(&path);
        assert!(store.token().is_none());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_user_entry_is_removed_from_disk() {
        let path = temp_session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"token": "tok_123", "user": "{not json"}"#,
        )
        .unwrap();

        let store = FileSessionStore::open(&path);
        assert!(store.user().is_none());
        // Token untouched, corrupt entry dropped from the file
        assert_eq!(store.token().unwrap().expose_secret(), "tok_123");
        let reopened = FileSessionStore::open(&path);
        assert!(reopened.user().is_none());
        assert!(reopened.token().is_some());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
