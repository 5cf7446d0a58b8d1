use std::future::Future;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::Note;
use crate::screens::Alert;
use crate::session::Route;
use crate::utils::TareasError;

/// Result of a background request, routed back to the UI loop
#[derive(Debug)]
pub enum TaskResult {
    LoggedIn(Result<Route, TareasError>),
    Registered(Result<Alert, TareasError>),
    NotesLoaded(Result<Vec<Note>, TareasError>),
    NoteDeleted(i64, Result<(), TareasError>),
    NoteOpened(Result<Note, TareasError>),
    NoteSaved(Result<Note, TareasError>),
    SignedOut(Result<(), TareasError>),
}

impl TaskResult {
    /// Results that still apply after the screen that started them is gone
    fn outlives_screen(&self) -> bool {
        matches!(self, Self::SignedOut(_))
    }
}

/// A task result tagged with the screen generation that started it
#[derive(Debug)]
pub struct ScreenEvent {
    pub epoch: u64,
    pub result: TaskResult,
}

/// Requests owned by the screen on display.
///
/// Leaving the screen cancels everything still in flight and bumps the
/// epoch, so a late answer for a previous screen is recognisable and dropped.
pub struct RequestScope {
    epoch: u64,
    token: CancellationToken,
    tx: mpsc::Sender<ScreenEvent>,
}

impl RequestScope {
    pub fn new(tx: mpsc::Sender<ScreenEvent>) -> Self {
        Self {
            epoch: 0,
            token: CancellationToken::new(),
            tx,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Run `task` until it finishes or the scope is renewed
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let token = self.token.clone();
        let tx = self.tx.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Request for screen {} cancelled", epoch);
                }
                result = task => {
                    let _ = tx.send(ScreenEvent { epoch, result }).await;
                }
            }
        });
    }

    /// Run `task` to completion even if the scope is renewed meanwhile
    pub fn spawn_detached<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.tx.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let result = task.await;
            let _ = tx.send(ScreenEvent { epoch, result }).await;
        });
    }

    /// Start a new screen generation, cancelling the old one
    pub fn renew(&mut self) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.epoch += 1;
    }

    pub fn is_current(&self, event: &ScreenEvent) -> bool {
        event.epoch == self.epoch || event.result.outlives_screen()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
