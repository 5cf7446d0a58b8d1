use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use super::traits::CredentialStore;
use crate::utils::StorageError;

/// Credential store backed by a small TOML file
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Create a store at `path`; the file is created lazily on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to modify before a write. An unreadable file is replaced
    /// rather than blocking every later login and logout; the flag reports it.
    async fn entries_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        match self.read_entries().await {
            Ok(entries) => Ok((entries, false)),
            Err(StorageError::Parse(e)) => {
                warn!("Replacing unreadable credentials file {}: {}", self.path.display(), e);
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(entries)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, content.as_bytes()))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
/// The temp file is created owner-only (0600 on unix).
fn replace_file(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.read_entries().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let (mut entries, _) = self.entries_for_write().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let (mut entries, unreadable) = self.entries_for_write().await?;
        if entries.remove(key).is_some() || unreadable {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
