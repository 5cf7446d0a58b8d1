// Gateway module for TUI - follows the Train Station Pattern
// All external access must go through this gateway

mod app;
mod input;
mod render;
mod scope;
mod ui;

pub use app::{App, Target, View};
pub use scope::{RequestScope, ScreenEvent, TaskResult};
pub use ui::run_ui;
