/// Session management module - Gateway

mod context;
mod gate;

pub use context::SessionContext;
pub use gate::{Route, SessionGate};
