use std::fmt;
use thiserror::Error;

use crate::constants::MIN_PASSWORD_LEN;

/// Remote operation a request failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    ListNotes,
    GetNote(i64),
    CreateNote,
    UpdateNote(i64),
    DeleteNote(i64),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "register"),
            Self::ListNotes => write!(f, "list notes"),
            Self::GetNote(id) => write!(f, "get note {}", id),
            Self::CreateNote => write!(f, "create note"),
            Self::UpdateNote(id) => write!(f, "update note {}", id),
            Self::DeleteNote(id) => write!(f, "delete note {}", id),
        }
    }
}

/// Client-side input errors, raised before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least {min} characters long.")]
    PasswordTooShort { min: usize },

    #[error("The note title cannot be empty.")]
    EmptyTitle,
}

impl ValidationError {
    pub fn password_too_short() -> Self {
        Self::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        }
    }
}

/// Failures of the credential store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed credentials file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not encode credentials: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Main error type for Tareas
#[derive(Error, Debug)]
pub enum TareasError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Request failed: {0}")]
    RequestFailed(Operation),

    #[error("Login response did not contain a token")]
    InvalidCredentials,

    #[error("Registration response did not confirm a new user")]
    RegistrationRejected,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Sign out failed: {0}")]
    SignOutFailed(#[source] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UI error: {0}")]
    Ui(String),
}

impl TareasError {
    /// Static message shown to the user; server details never leak through here
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::RequestFailed(op) => match op {
                Operation::Login => "An error occurred while signing in.",
                Operation::Register => "An error occurred during registration.",
                Operation::ListNotes => "Could not load your notes.",
                Operation::GetNote(_) => "Could not load the note.",
                Operation::CreateNote => "Could not create the note.",
                Operation::UpdateNote(_) => "Could not update the note.",
                Operation::DeleteNote(_) => "Could not delete the note.",
            }
            .to_string(),
            Self::InvalidCredentials => "Incorrect credentials.".to_string(),
            Self::RegistrationRejected => "Could not register the user.".to_string(),
            Self::Storage(_) => "Could not save your session.".to_string(),
            Self::SignOutFailed(_) => "Could not sign out.".to_string(),
            Self::Config(_) => "The configuration could not be loaded.".to_string(),
            Self::Io(_) | Self::Ui(_) => "An unexpected error occurred.".to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
