pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod runtime;
pub mod screens;
pub mod session;
pub mod storage;
pub mod tui;
pub mod utils;

pub use api::{HttpApiClient, NewNote, Note, NotePatch, NotesApi};
pub use app::{load_config, AppState, Config};
pub use session::{Route, SessionContext, SessionGate};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use tui::run_ui;
pub use utils::TareasError;
