// Gateway module for screen logic - follows the Train Station Pattern
// Presentation-free flows shared by the CLI and the TUI

mod alert;
mod login;
mod note_editor;
mod notes_list;
mod register;
mod validation;

pub use alert::Alert;
pub use login::LoginScreen;
pub use note_editor::{EditorMode, NoteEditor};
pub use notes_list::{note_preview, ListState, NotesList};
pub use register::RegisterScreen;
pub use validation::{is_valid_email, validate_credentials, validate_email, validate_password};
