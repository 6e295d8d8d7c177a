use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const TOKEN_KEY: &str = "token";

fn attempt_key(quiz_id: i64) -> String {
    format!("quiz_attempt_{}", quiz_id)
}

/// Durable string storage, one key per operation. Injectable so the
/// attempt flow and API client can be tested against [`MemoryStore`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.map.lock().expect("session store mutex poisoned");
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.map.lock().expect("session store mutex poisoned");
        map.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut map = self.map.lock().expect("session store mutex poisoned");
        map.remove(key);
    }

    fn clear(&self) {
        let mut map = self.map.lock().expect("session store mutex poisoned");
        map.clear();
    }
}

/// JSON-file-backed store. Loaded once on open, written through on every
/// mutation so state survives process restarts.
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cache = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => HashMap::new(),
        };
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    fn persist(&self, cache: &HashMap<String, String>) {
        let json = match serde_json::to_string_pretty(cache) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize session file: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            tracing::error!("Failed to write session file {:?}: {}", self.path, e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let cache = self.cache.lock().expect("session store mutex poisoned");
        cache.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut cache = self.cache.lock().expect("session store mutex poisoned");
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache);
    }

    fn remove(&self, key: &str) {
        let mut cache = self.cache.lock().expect("session store mutex poisoned");
        cache.remove(key);
        self.persist(&cache);
    }

    fn clear(&self) {
        let mut cache = self.cache.lock().expect("session store mutex poisoned");
        cache.clear();
        self.persist(&cache);
    }
}

/// Holds the bearer token and the per-quiz in-progress attempt id.
/// No client-side expiry: entries live until logout or token clear.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    pub fn attempt_id(&self, quiz_id: i64) -> Option<i64> {
        self.store
            .get(&attempt_key(quiz_id))
            .and_then(|raw| raw.parse().ok())
    }

    pub fn set_attempt_id(&self, quiz_id: i64, attempt_id: i64) {
        self.store.set(&attempt_key(quiz_id), &attempt_id.to_string());
    }

    /// Wipes the token and all attempt ids. Used by logout and by the
    /// global 401 handler.
    pub fn clear(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let session = SessionStore::in_memory();
        assert_eq!(session.token(), None);

        session.set_token("abc123");
        assert_eq!(session.token(), Some("abc123".to_string()));

        session.clear_token();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn attempt_ids_are_keyed_per_quiz() {
        let session = SessionStore::in_memory();
        session.set_attempt_id(1, 100);
        session.set_attempt_id(2, 200);

        assert_eq!(session.attempt_id(1), Some(100));
        assert_eq!(session.attempt_id(2), Some(200));
        assert_eq!(session.attempt_id(3), None);

        // A new attempt for the same quiz supersedes the old id.
        session.set_attempt_id(1, 101);
        assert_eq!(session.attempt_id(1), Some(101));
    }

    #[test]
    fn clear_wipes_token_and_attempt_ids() {
        let session = SessionStore::in_memory();
        session.set_token("abc123");
        session.set_attempt_id(7, 70);

        session.clear();
        assert_eq!(session.token(), None);
        assert_eq!(session.attempt_id(7), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "quiz-session-test-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let session = SessionStore::new(Box::new(FileStore::open(&path).unwrap()));
            session.set_token("persisted");
            session.set_attempt_id(5, 55);
        }

        let session = SessionStore::new(Box::new(FileStore::open(&path).unwrap()));
        assert_eq!(session.token(), Some("persisted".to_string()));
        assert_eq!(session.attempt_id(5), Some(55));

        let _ = fs::remove_file(&path);
    }
}
