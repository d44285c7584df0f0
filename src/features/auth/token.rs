//! Durable token slots for the console session.
//!
//! The store is a dumb key/value slot per credential: no expiry tracking, no
//! encryption, values replaced wholesale. `set` rejects blank values; clearing is
//! always explicit. The file-backed store writes synchronously so a token saved by
//! `login` is visible to the next process.

use secrecy::SecretString;
use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Persisted slots. File names match the keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
    /// One-shot marker written when a `401` tore the session down.
    SessionExpired,
}

impl TokenKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
            Self::SessionExpired => "session_expired",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("refusing to store an empty {0}; clear the slot instead")]
    EmptyToken(&'static str),
    #[error("token store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait TokenStore: Send + Sync {
    /// Reads a slot; `Ok(None)` when it was never written or has been cleared.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, StoreError>;

    /// Overwrites a slot.
    ///
    /// # Errors
    /// Returns [`StoreError::EmptyToken`] for blank values, or an I/O error.
    fn set(&self, key: TokenKey, token: &str) -> Result<(), StoreError>;

    /// Removes a slot; clearing an empty slot is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self, key: TokenKey) -> Result<(), StoreError>;

    /// Clears both credential slots.
    ///
    /// # Errors
    /// Returns the first storage error encountered.
    fn clear_credentials(&self) -> Result<(), StoreError> {
        self.clear(TokenKey::Access)?;
        self.clear(TokenKey::Refresh)
    }
}

fn ensure_not_blank(key: TokenKey, token: &str) -> Result<(), StoreError> {
    if token.trim().is_empty() {
        Err(StoreError::EmptyToken(key.as_str()))
    } else {
        Ok(())
    }
}

/// One file per slot inside the console state directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: TokenKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    fn io_error(path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Each write gets its own temp file in the state directory, so concurrent
    /// writers of one slot never share bytes; the last rename wins.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;

        // Created with mode 0600 on unix.
        let mut file = NamedTempFile::new_in(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| Self::io_error(file.path(), e))?;
        file.persist(path)
            .map(|_| ())
            .map_err(|e| Self::io_error(path, e.error))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, StoreError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(trimmed.to_string())))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(&path, err)),
        }
    }

    fn set(&self, key: TokenKey, token: &str) -> Result<(), StoreError> {
        ensure_not_blank(key, token)?;
        let path = self.path(key);
        self.write_atomic(&path, token.trim())?;
        debug!(slot = key.as_str(), "token slot written");
        Ok(())
    }

    fn clear(&self, key: TokenKey) -> Result<(), StoreError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(slot = key.as_str(), "token slot cleared");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(&path, err)),
        }
    }
}

/// In-process store for tests and embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: Mutex<HashMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot value, for assertions.
    #[must_use]
    pub fn peek(&self, key: TokenKey) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, StoreError> {
        Ok(self.peek(key).map(SecretString::from))
    }

    fn set(&self, key: TokenKey, token: &str) -> Result<(), StoreError> {
        ensure_not_blank(key, token)?;
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, token.trim().to_string());
        Ok(())
    }

    fn clear(&self, key: TokenKey) -> Result<(), StoreError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn exposed(store: &dyn TokenStore, key: TokenKey) -> Option<String> {
        store
            .get(key)
            .unwrap()
            .map(|secret| secret.expose_secret().to_string())
    }

    #[test]
    fn file_store_round_trips_and_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("state"));
        store.set(TokenKey::Access, "A").unwrap();
        store.set(TokenKey::Refresh, "R").unwrap();

        let reopened = FileTokenStore::new(dir.path().join("state"));
        assert_eq!(exposed(&reopened, TokenKey::Access), Some("A".to_string()));
        assert_eq!(exposed(&reopened, TokenKey::Refresh), Some("R".to_string()));
    }

    #[test]
    fn file_store_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.set(TokenKey::Access, "first-long-token").unwrap();
        store.set(TokenKey::Access, "B").unwrap();
        assert_eq!(exposed(&store, TokenKey::Access), Some("B".to_string()));
    }

    #[test]
    fn file_store_missing_slot_is_none_and_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        assert_eq!(exposed(&store, TokenKey::Access), None);
        store.clear(TokenKey::Access).unwrap();
        store.clear(TokenKey::Access).unwrap();

        store.set(TokenKey::Access, "A").unwrap();
        store.clear(TokenKey::Access).unwrap();
        assert_eq!(exposed(&store, TokenKey::Access), None);
    }

    #[test]
    fn blank_tokens_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        assert!(matches!(
            store.set(TokenKey::Access, "   "),
            Err(StoreError::EmptyToken("access_token"))
        ));

        let memory = MemoryTokenStore::new();
        assert!(matches!(
            memory.set(TokenKey::Refresh, ""),
            Err(StoreError::EmptyToken("refresh_token"))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_writes_private_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.set(TokenKey::Access, "A").unwrap();
        let mode = fs::metadata(dir.path().join("access_token"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn concurrent_writers_of_one_slot_never_fail() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileTokenStore::new(dir.path()));

        for round in 0..50 {
            let handles: Vec<_> = ["first-token-value", "B"]
                .into_iter()
                .map(|token| {
                    let store = store.clone();
                    std::thread::spawn(move || store.set(TokenKey::Access, token))
                })
                .collect();
            for handle in handles {
                handle.join().unwrap().unwrap();
            }

            let stored = exposed(store.as_ref(), TokenKey::Access);
            assert!(
                matches!(stored.as_deref(), Some("first-token-value" | "B")),
                "round {round}: unexpected slot contents {stored:?}"
            );
        }

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "only the access_token file should remain");
    }

    #[test]
    fn clear_credentials_keeps_expired_flag() {
        let memory = MemoryTokenStore::new();
        memory.set(TokenKey::Access, "A").unwrap();
        memory.set(TokenKey::Refresh, "R").unwrap();
        memory.set(TokenKey::SessionExpired, "1").unwrap();

        memory.clear_credentials().unwrap();

        assert_eq!(memory.peek(TokenKey::Access), None);
        assert_eq!(memory.peek(TokenKey::Refresh), None);
        assert_eq!(memory.peek(TokenKey::SessionExpired), Some("1".to_string()));
    }
}
