use anyhow::{Context, Result};
use std::sync::Arc;

use crate::api::{HttpApiClient, NotesApi};
use crate::app::Config;
use crate::session::{SessionContext, SessionGate};
use crate::storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

/// Everything a command or screen needs, wired once at startup
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Session token access
    pub session: SessionContext,
    /// Remote API
    pub api: Arc<dyn NotesApi>,
}

impl AppState {
    /// Build the credential store and HTTP client described by `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = if config.storage.persist {
            Arc::new(FileCredentialStore::new(config.storage.credentials_path()?))
        } else {
            Arc::new(MemoryCredentialStore::new())
        };
        let session = SessionContext::new(store);

        let api = HttpApiClient::new(&config.api.base_url, session.clone(), config.api.timeout())
            .context("Failed to create API client")?;

        Ok(Self::new(config, session, Arc::new(api)))
    }

    /// Create app state from already-built parts
    pub fn new(config: Config, session: SessionContext, api: Arc<dyn NotesApi>) -> Self {
        Self {
            config,
            session,
            api,
        }
    }

    /// Fresh gate over this state's session
    pub fn gate(&self) -> SessionGate {
        SessionGate::new(self.session.clone())
    }
}
