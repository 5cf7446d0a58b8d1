// Gateway module for credential storage - follows the Train Station Pattern
// All external access must go through this gateway

mod file_store;
mod memory;
mod traits;

pub use file_store::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use traits::CredentialStore;

#[cfg(test)]
pub use traits::MockCredentialStore;
