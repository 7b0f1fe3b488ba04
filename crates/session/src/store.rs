//! Durable key-value storage for the client session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

pub const TOKEN_KEY: &str = "bustix.token";
pub const EXPIRY_KEY: &str = "bustix.tokenExpiry";
pub const REFRESH_TOKEN_KEY: &str = "bustix.refreshToken";
pub const USER_INFO_KEY: &str = "bustix.userInfo";

/// Every key a session writes. Clearing the session removes all of them.
pub const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, EXPIRY_KEY, REFRESH_TOKEN_KEY, USER_INFO_KEY];

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize session data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous string key-value storage that outlives the process.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;

    /// Remove several keys. Stores that can should do this in one write.
    fn remove_all(&self, keys: &[&str]) -> Result<(), SessionStoreError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Remove every session key from `store`.
pub fn clear_persisted_session(store: &dyn SessionStore) -> Result<(), SessionStoreError> {
    store.remove_all(&SESSION_KEYS)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON-object file store.
///
/// The whole file is rewritten (via a sibling temp file and rename) on every
/// mutation, so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open `path`, creating parent directories. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SessionStoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| SessionStoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SessionStoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened session file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");

        std::fs::write(&tmp, payload).map_err(|source| SessionStoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| SessionStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), SessionStoreError> {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() != before {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
