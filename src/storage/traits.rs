use async_trait::async_trait;

use crate::utils::StorageError;

/// Asynchronous key-value capability used to persist the session token
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Human readable location, shown by `tareas status`
    fn describe(&self) -> String;
}
