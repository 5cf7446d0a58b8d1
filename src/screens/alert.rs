use crate::session::Route;
use crate::utils::TareasError;

/// A modal message, optionally followed by navigation once dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub then: Option<Route>,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            then: None,
        }
    }

    /// Generic alert for a failed action
    pub fn error(err: &TareasError) -> Self {
        Self::info("Error", err.user_message())
    }

    pub fn then(mut self, route: Route) -> Self {
        self.then = Some(route);
        self
    }
}
