use std::sync::Arc;
use tracing::info;

use super::validation::validate_credentials;
use crate::api::NotesApi;
use crate::session::{Route, SessionContext};
use crate::utils::TareasError;

/// Sign-in flow: validate, call the API, persist the token
#[derive(Clone)]
pub struct LoginScreen {
    api: Arc<dyn NotesApi>,
    session: SessionContext,
}

impl LoginScreen {
    pub fn new(api: Arc<dyn NotesApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Route to navigate to on success
    pub async fn submit(&self, email: &str, password: &str) -> Result<Route, TareasError> {
        validate_credentials(email, password)?;

        let response = self.api.login(email, password).await?;
        match response.token.filter(|token| !token.is_empty()) {
            Some(token) => {
                self.session.save_token(&token).await?;
                info!("Signed in as {}", email);
                Ok(Route::App)
            }
            None => Err(TareasError::InvalidCredentials),
        }
    }
}
