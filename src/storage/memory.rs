use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::CredentialStore;
use crate::utils::StorageError;

/// Process-local store; nothing survives the run
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a single entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.lock().insert(key.to_string(), value.to_string());
        store
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory (not persisted)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get("token").await.unwrap(), None);

        store.set("token", "abc").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));

        store.remove("token").await.unwrap();
        store.remove("token").await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }
}
