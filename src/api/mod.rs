// Gateway module for the remote API - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod client;
mod traits;
mod types;

// Public re-exports - the ONLY way to access API functionality
pub use client::HttpApiClient;
pub use traits::NotesApi;
pub use types::{LoginResponse, NewNote, Note, NotePatch, RegisterResponse};

#[cfg(test)]
pub use traits::MockNotesApi;
