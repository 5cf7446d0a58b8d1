use tokio::sync::OnceCell;
use tracing::info;

use super::context::SessionContext;

/// Where the app starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Authenticated shell (notes list)
    App,
    /// Login flow
    Login,
}

/// Decides the initial route from the stored token, once per launch.
///
/// No expiry check and no round-trip: an expired token is discovered later,
/// when the API rejects a request.
pub struct SessionGate {
    session: SessionContext,
    decision: OnceCell<Route>,
}

impl SessionGate {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            decision: OnceCell::new(),
        }
    }

    pub async fn determine_initial_route(&self) -> Route {
        *self
            .decision
            .get_or_init(|| async {
                let route = if self.session.is_authenticated().await {
                    Route::App
                } else {
                    Route::Login
                };
                info!("Session gate resolved {:?}", route);
                route
            })
            .await
    }
}
