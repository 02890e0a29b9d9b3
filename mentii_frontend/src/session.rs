//! Client-held session: bearer token plus the cached user record.
//!
//! The session lives behind a cloneable [`Session`] handle that is passed to
//! whoever needs it (the app and the API client). Persistence goes through a
//! [`SessionStorage`] backend keyed by two fixed names.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use log::{info, warn};
use thiserror::Error;

use crate::models::User;
use crate::routes::AuthState;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize user record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key/value storage for the session keys.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Stores each key as a file inside `dir`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

fn io_err(key: &str) -> impl FnOnce(io::Error) -> SessionError + '_ {
    move |source| SessionError::Io {
        key: key.to_string(),
        source,
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(key)(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(io_err(key))?;
        let target = self.path(key);
        let staging = self.dir.join(format!(".{key}.tmp"));
        fs::write(&staging, value).map_err(io_err(key))?;
        fs::rename(&staging, &target).map_err(io_err(key))
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err(key)(err)),
        }
    }
}

/// File storage under `dir`, or in-process storage when `dir` cannot be created.
pub fn open_storage(dir: &Path) -> Arc<dyn SessionStorage> {
    match fs::create_dir_all(dir) {
        Ok(()) => Arc::new(FileStorage::new(dir)),
        Err(err) => {
            warn!(
                "cannot use {} for session data ({err}); the session will not survive a restart",
                dir.display()
            );
            Arc::new(MemoryStorage::new())
        }
    }
}

/// In-process storage, used by tests and by [`open_storage`] when no data directory is usable.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self
            .entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Shared handle to the process-wide session.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn SessionStorage>,
}

impl Session {
    /// Restores the session from storage. Anything unreadable counts as logged out.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let state = match read_persisted(storage.as_ref()) {
            Ok(Some(state)) => {
                info!("restored persisted session");
                state
            }
            Ok(None) => SessionState::default(),
            Err(err) => {
                warn!("discarding unreadable session: {err}");
                for key in [TOKEN_KEY, USER_KEY] {
                    if let Err(err) = storage.remove(key) {
                        warn!("failed to clear unreadable session: {err}");
                    }
                }
                SessionState::default()
            }
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            storage,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok().and_then(|state| state.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().ok().and_then(|state| state.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|state| state.token.is_some())
            .unwrap_or(false)
    }

    pub fn auth_state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Records a fresh login. Memory is updated even when persisting fails.
    pub fn set_session(&self, token: impl Into<String>, user: User) -> Result<(), SessionError> {
        let token = token.into();
        let serialized = serde_json::to_string(&user)?;
        if let Ok(mut state) = self.state.write() {
            state.token = Some(token.clone());
            state.user = Some(user);
        }
        self.storage.set(TOKEN_KEY, &token)?;
        self.storage.set(USER_KEY, &serialized)
    }

    pub fn clear_session(&self) -> Result<(), SessionError> {
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::default();
        }
        let token_result = self.storage.remove(TOKEN_KEY);
        let user_result = self.storage.remove(USER_KEY);
        token_result.and(user_result)
    }
}

fn read_persisted(storage: &dyn SessionStorage) -> Result<Option<SessionState>, String> {
    let token = match storage.get(TOKEN_KEY).map_err(|err| err.to_string())? {
        Some(token) if !token.trim().is_empty() => token,
        _ => return Ok(None),
    };
    let user = match storage.get(USER_KEY).map_err(|err| err.to_string())? {
        Some(raw) => Some(
            serde_json::from_str::<User>(&raw).map_err(|err| format!("corrupt user record: {err}"))?,
        ),
        None => None,
    };
    Ok(Some(SessionState {
        token: Some(token),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_user() -> User {
        User {
            id: 1,
            full_name: "Amina Njeri".into(),
            email: "amina@example.com".into(),
            subjects: vec!["Math".into()],
            ..Default::default()
        }
    }

    #[test]
    fn empty_storage_is_anonymous() {
        let session = Session::load(Arc::new(MemoryStorage::new()));
        assert!(!session.is_authenticated());
        assert_eq!(session.auth_state(), AuthState::Anonymous);
        assert!(session.user().is_none());
    }

    #[test]
    fn set_session_persists_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::load(storage.clone());
        session.set_session("tok-1", sample_user()).unwrap();

        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert!(storage.contains(TOKEN_KEY));
        assert!(storage.contains(USER_KEY));

        let restored = Session::load(storage);
        assert_eq!(restored.token().as_deref(), Some("tok-1"));
        assert_eq!(restored.user(), Some(sample_user()));
    }

    #[test]
    fn clear_session_removes_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::load(storage.clone());
        session.set_session("tok-1", sample_user()).unwrap();
        session.clear_session().unwrap();

        assert!(!session.is_authenticated());
        assert!(!storage.contains(TOKEN_KEY));
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn clones_share_state() {
        let session = Session::load(Arc::new(MemoryStorage::new()));
        let other = session.clone();
        session.set_session("shared", sample_user()).unwrap();
        assert_eq!(other.token().as_deref(), Some("shared"));
    }

    #[test]
    fn corrupt_user_record_is_logged_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        let session = Session::load(storage.clone());
        assert!(!session.is_authenticated());
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn file_storage_survives_reload() {
        let dir = tempdir().unwrap();
        let session = Session::load(Arc::new(FileStorage::new(dir.path().join("session"))));
        session.set_session("disk-token", sample_user()).unwrap();

        let restored = Session::load(Arc::new(FileStorage::new(dir.path().join("session"))));
        assert_eq!(restored.token().as_deref(), Some("disk-token"));
        assert_eq!(restored.user().map(|u| u.email), Some("amina@example.com".to_string()));

        restored.clear_session().unwrap();
        assert!(!dir.path().join("session").join(TOKEN_KEY).exists());
        assert!(!dir.path().join("session").join(USER_KEY).exists());
    }

    #[test]
    fn unusable_data_dir_falls_back_to_memory() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "occupied").unwrap();

        let storage = open_storage(&blocker.join("session"));
        storage.set(TOKEN_KEY, "tok").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert!(!blocker.join("session").exists());
    }

    #[test]
    fn usable_data_dir_persists_to_disk() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir.path().join("session"));
        storage.set(TOKEN_KEY, "tok").unwrap();
        assert!(dir.path().join("session").join(TOKEN_KEY).exists());
    }

    #[test]
    fn file_storage_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        storage.remove(TOKEN_KEY).unwrap();
    }
}
