//! Session context: the bearer token and username of the signed-in user.
//!
//! Constructed once at start-up and handed to the [`ApiClient`](crate::ApiClient);
//! nothing reads the stored slots ambiently.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Persisted session slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    Username,
}

impl SessionKey {
    /// Storage key, shared with the browser pages.
    pub fn storage_key(&self) -> &'static str {
        match self {
            SessionKey::Token => "jwtToken",
            SessionKey::Username => "username",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),
    #[error("session storage unavailable")]
    Unavailable,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Backing store for the session slots.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: SessionKey) -> SessionResult<Option<String>>;

    fn save(&self, key: SessionKey, value: &str) -> SessionResult<()>;

    fn remove(&self, key: SessionKey) -> SessionResult<()>;
}

/// In-memory store for tests and one-shot processes.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slots: RwLock<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E>(_: E) -> SessionError {
    SessionError::Storage("session lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: SessionKey) -> SessionResult<Option<String>> {
        Ok(self.slots.read().map_err(poisoned)?.get(&key).cloned())
    }

    fn save(&self, key: SessionKey, value: &str) -> SessionResult<()> {
        self.slots
            .write()
            .map_err(poisoned)?
            .insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> SessionResult<()> {
        self.slots.write().map_err(poisoned)?.remove(&key);
        Ok(())
    }
}

/// JSON file store (`{"jwtToken": "...", "username": "..."}`).
///
/// Keeps a CLI signed in between invocations.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileSessionStore {
    path: std::path::PathBuf,
    guard: std::sync::Mutex<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileSessionStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: std::sync::Mutex::new(()),
        }
    }

    /// `<config dir>/stockguard/session.json`, if the platform has a config dir.
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stockguard").join("session.json"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_all(&self) -> SessionResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                SessionError::Storage(format!("corrupt session file {:?}: {e}", self.path))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(SessionError::Storage(format!(
                "failed to read {:?}: {e}",
                self.path
            ))),
        }
    }

    fn write_all(&self, slots: &HashMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::Storage(format!("failed to create {parent:?}: {e}"))
            })?;
        }
        let raw = serde_json::to_string_pretty(slots)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| SessionError::Storage(format!("failed to write {:?}: {e}", self.path)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStore for FileSessionStore {
    fn load(&self, key: SessionKey) -> SessionResult<Option<String>> {
        let _guard = self.guard.lock().map_err(poisoned)?;
        Ok(self.read_all()?.remove(key.storage_key()))
    }

    fn save(&self, key: SessionKey, value: &str) -> SessionResult<()> {
        let _guard = self.guard.lock().map_err(poisoned)?;
        let mut slots = self.read_all()?;
        slots.insert(key.storage_key().to_string(), value.to_string());
        self.write_all(&slots)
    }

    fn remove(&self, key: SessionKey) -> SessionResult<()> {
        let _guard = self.guard.lock().map_err(poisoned)?;
        let mut slots = self.read_all()?;
        if slots.remove(key.storage_key()).is_some() {
            self.write_all(&slots)?;
        }
        Ok(())
    }
}

/// Handle on the current session, cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// Stored bearer token. A failing store reads as signed out.
    pub fn token(&self) -> Option<String> {
        self.read(SessionKey::Token)
    }

    pub fn username(&self) -> Option<String> {
        self.read(SessionKey::Username)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Record a successful login. Either both slots are written or neither.
    pub fn sign_in(&self, token: &str, username: &str) -> SessionResult<()> {
        self.store.save(SessionKey::Token, token)?;
        if let Err(e) = self.store.save(SessionKey::Username, username) {
            if let Err(undo) = self.store.remove(SessionKey::Token) {
                tracing::warn!(error = %undo, "failed to roll back session token");
            }
            return Err(e);
        }
        tracing::debug!(username, "session stored");
        Ok(())
    }

    /// Replace the stored username, keeping the token.
    pub fn rename(&self, username: &str) -> SessionResult<()> {
        self.store.save(SessionKey::Username, username)?;
        tracing::debug!(username, "session username updated");
        Ok(())
    }

    /// Forget both slots.
    pub fn sign_out(&self) -> SessionResult<()> {
        self.store.remove(SessionKey::Token)?;
        self.store.remove(SessionKey::Username)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    fn read(&self, key: SessionKey) -> Option<String> {
        match self.store.load(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(slot = key.storage_key(), error = %e, "session slot unreadable");
                None
            }
        }
    }
}

impl core::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("stockguard-session-{}", uuid::Uuid::now_v7()))
            .join("session.json")
    }

    #[test]
    fn sign_in_and_out_roundtrip() {
        let session = SessionContext::in_memory();
        assert!(!session.is_authenticated());

        session.sign_in("tok-1", "jdoe").unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.username().as_deref(), Some("jdoe"));

        session.sign_out().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(session.username(), None);
    }

    /// Memory store whose writes to one slot always fail.
    struct StickySlot {
        inner: MemorySessionStore,
        broken: SessionKey,
    }

    impl SessionStore for StickySlot {
        fn load(&self, key: SessionKey) -> SessionResult<Option<String>> {
            self.inner.load(key)
        }

        fn save(&self, key: SessionKey, value: &str) -> SessionResult<()> {
            if key == self.broken {
                return Err(SessionError::Storage("disk full".to_string()));
            }
            self.inner.save(key, value)
        }

        fn remove(&self, key: SessionKey) -> SessionResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_username_write_leaves_no_token_behind() {
        let session = SessionContext::new(StickySlot {
            inner: MemorySessionStore::new(),
            broken: SessionKey::Username,
        });

        let err = session.sign_in("tok", "jdoe").unwrap_err();

        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(session.token(), None);
        assert_eq!(session.username(), None);
    }

    #[test]
    fn rename_keeps_the_token() {
        let session = SessionContext::in_memory();
        session.sign_in("tok", "jdoe").unwrap();

        session.rename("janedoe").unwrap();

        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.username().as_deref(), Some("janedoe"));
    }

    #[test]
    fn clones_share_state() {
        let session = SessionContext::in_memory();
        let other = session.clone();
        session.sign_in("tok", "jdoe").unwrap();
        assert!(other.is_authenticated());
    }

    #[test]
    fn empty_token_reads_as_absent() {
        let store = MemorySessionStore::new();
        store.save(SessionKey::Token, "").unwrap();
        let session = SessionContext::new(store);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn debug_does_not_leak_token() {
        let session = SessionContext::in_memory();
        session.sign_in("secret-token", "jdoe").unwrap();
        let printed = format!("{session:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("authenticated: true"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = temp_session_path();

        let first = SessionContext::new(FileSessionStore::new(&path));
        first.sign_in("tok-file", "jdoe").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let slots: HashMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(slots.get("jwtToken").map(String::as_str), Some("tok-file"));

        let second = SessionContext::new(FileSessionStore::new(&path));
        assert_eq!(second.token().as_deref(), Some("tok-file"));

        second.sign_out().unwrap();
        assert!(!first.is_authenticated());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_store_missing_file_is_signed_out() {
        let store = FileSessionStore::new(temp_session_path());
        assert_eq!(store.load(SessionKey::Token).unwrap(), None);
        store.remove(SessionKey::Username).unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let path = temp_session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(SessionKey::Token), Err(SessionError::Storage(_))));
        assert!(!SessionContext::new(FileSessionStore::new(&path)).is_authenticated());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
