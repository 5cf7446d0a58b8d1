use std::sync::Arc;
use tracing::info;

use super::alert::Alert;
use super::validation::validate_credentials;
use crate::api::NotesApi;
use crate::session::Route;
use crate::utils::TareasError;

/// Sign-up flow
#[derive(Clone)]
pub struct RegisterScreen {
    api: Arc<dyn NotesApi>,
}

impl RegisterScreen {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        Self { api }
    }

    /// Success alert that leads back to the login screen
    pub async fn submit(&self, email: &str, password: &str) -> Result<Alert, TareasError> {
        validate_credentials(email, password)?;

        let response = self.api.register(email, password).await?;
        if !response.success {
            return Err(TareasError::RegistrationRejected);
        }

        info!("Registered {}", email);
        Ok(Alert::info("Registration successful", "You can sign in now.").then(Route::Login))
    }
}
