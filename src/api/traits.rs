use async_trait::async_trait;

use super::types::{LoginResponse, NewNote, Note, NotePatch, RegisterResponse};
use crate::utils::TareasError;

/// Operations of the remote notes API.
///
/// Every failure (non-2xx status, transport, decoding) surfaces as
/// `TareasError::RequestFailed` for the matching operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, TareasError>;

    async fn register(&self, username: &str, password: &str)
        -> Result<RegisterResponse, TareasError>;

    /// Notes in server order
    async fn list_notes(&self) -> Result<Vec<Note>, TareasError>;

    async fn get_note(&self, id: i64) -> Result<Note, TareasError>;

    async fn create_note(&self, note: &NewNote) -> Result<Note, TareasError>;

    async fn update_note(&self, id: i64, patch: &NotePatch) -> Result<Note, TareasError>;

    async fn delete_note(&self, id: i64) -> Result<(), TareasError>;

    /// Base URL requests go to
    fn base_url(&self) -> String;
}
