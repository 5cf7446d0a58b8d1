use std::sync::Arc;
use tracing::warn;

use crate::constants::TOKEN_KEY;
use crate::storage::CredentialStore;
use crate::utils::{StorageError, TareasError};

/// Explicit handle on the stored session token.
///
/// Handed to the API client and the screens at construction, so nothing reads
/// ambient storage behind their back. The token is never cached here: every
/// call goes back to the store.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Current token; read failures and empty values count as signed out
    pub async fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!("Could not read session token: {}", e);
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    /// Persist a freshly issued token
    pub async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token).await
    }

    /// Forget the token (logout)
    pub async fn sign_out(&self) -> Result<(), TareasError> {
        self.store
            .remove(TOKEN_KEY)
            .await
            .map_err(TareasError::SignOutFailed)
    }

    pub fn store_location(&self) -> String {
        self.store.describe()
    }
}
