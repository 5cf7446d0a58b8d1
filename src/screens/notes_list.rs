use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::api::{Note, NotesApi};
use crate::utils::TareasError;

static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Description with markup tags removed, cut to `max_chars` characters
pub fn note_preview(description: &str, max_chars: usize) -> String {
    MARKUP_RE
        .replace_all(description, "")
        .chars()
        .take(max_chars)
        .collect()
}

/// What the list shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Note>),
    Error(String),
}

/// Notes list: Loading -> Loaded | Error, re-entered on every focus.
///
/// Deletes go through an explicit confirmation, and a note whose delete is
/// already in flight cannot be deleted again.
#[derive(Debug)]
pub struct NotesList {
    state: ListState,
    pending_delete: Option<i64>,
    deleting: HashSet<i64>,
}

impl Default for NotesList {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesList {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
            pending_delete: None,
            deleting: HashSet::new(),
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Loaded notes; empty while loading or failed
    pub fn notes(&self) -> &[Note] {
        match &self.state {
            ListState::Loaded(notes) => notes,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    /// Loaded successfully with nothing in it
    pub fn is_empty(&self) -> bool {
        matches!(&self.state, ListState::Loaded(notes) if notes.is_empty())
    }

    pub fn begin_load(&mut self) {
        self.state = ListState::Loading;
    }

    pub fn finish_load(&mut self, result: Result<Vec<Note>, TareasError>) {
        self.state = match result {
            Ok(notes) => {
                debug!("Loaded {} notes", notes.len());
                ListState::Loaded(notes)
            }
            Err(err) => ListState::Error(err.user_message()),
        };
    }

    /// Fetch the list again (screen focus)
    pub async fn reload(&mut self, api: &dyn NotesApi) {
        self.begin_load();
        let result = api.list_notes().await;
        self.finish_load(result);
    }

    /// Ask for confirmation before deleting `id`. Refused when the note is
    /// unknown or already being deleted.
    pub fn request_delete(&mut self, id: i64) -> bool {
        if self.deleting.contains(&id) || !self.notes().iter().any(|n| n.id == id) {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// User confirmed; returns the id to send a delete for
    pub fn confirm_delete(&mut self) -> Option<i64> {
        let id = self.pending_delete.take()?;
        self.deleting.insert(id).then_some(id)
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting.contains(&id)
    }

    /// Apply the result of a delete; on success the note leaves the local list
    /// without a refetch
    pub fn finish_delete(&mut self, id: i64, result: Result<(), TareasError>) -> Result<(), TareasError> {
        self.deleting.remove(&id);
        result?;

        if let ListState::Loaded(notes) = &mut self.state {
            notes.retain(|note| note.id != id);
        }
        Ok(())
    }

    /// Confirm the pending delete and run it
    pub async fn delete_confirmed(&mut self, api: &dyn NotesApi) -> Result<Option<i64>, TareasError> {
        let Some(id) = self.confirm_delete() else {
            return Ok(None);
        };
        let result = api.delete_note(id).await;
        self.finish_delete(id, result).map(|_| Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockNotesApi;
    use crate::utils::Operation;
    use pretty_assertions::assert_eq;

    fn note(id: i64) -> Note {
        Note {
            id,
            title: format!("note {}", id),
            description: String::new(),
            completed: false,
        }
    }

    fn loaded(ids: &[i64]) -> NotesList {
        let mut list = NotesList::new();
        list.finish_load(Ok(ids.iter().copied().map(note).collect()));
        list
    }

    #[test]
    fn test_preview_strips_markup_and_truncates() {
        assert_eq!(note_preview("<p>Hello <b>world</b></p>", 200), "Hello world");
        assert_eq!(note_preview(&"á".repeat(300), 200).chars().count(), 200);
        assert_eq!(note_preview("a < b", 200), "a < b");
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let mut api = MockNotesApi::new();
        api.expect_list_notes().times(1).returning(|| Ok(vec![]));

        let mut list = NotesList::new();
        assert!(list.is_loading());
        list.reload(&api).await;

        assert_eq!(list.state(), &ListState::Loaded(vec![]));
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_shows_message() {
        let mut api = MockNotesApi::new();
        api.expect_list_notes()
            .returning(|| Err(TareasError::RequestFailed(Operation::ListNotes)));

        let mut list = loaded(&[1]);
        list.reload(&api).await;

        assert_eq!(list.state(), &ListState::Error("Could not load your notes.".to_string()));
        assert!(list.notes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_locally_without_refetch() {
        let mut api = MockNotesApi::new();
        api.expect_delete_note().times(1).returning(|_| Ok(()));
        api.expect_list_notes().times(0);

        let mut list = loaded(&[4, 5, 6]);
        assert!(list.request_delete(5));
        assert_eq!(list.delete_confirmed(&api).await.unwrap(), Some(5));

        assert_eq!(list.notes().iter().map(|n| n.id).collect::<Vec<_>>(), vec![4, 6]);
    }

    #[tokio::test]
    async fn test_cancelled_delete_makes_no_call() {
        let mut api = MockNotesApi::new();
        api.expect_delete_note().times(0);

        let mut list = loaded(&[5]);
        assert!(list.request_delete(5));
        list.cancel_delete();
        assert_eq!(list.delete_confirmed(&api).await.unwrap(), None);
        assert_eq!(list.notes().len(), 1);
    }

    #[test]
    fn test_duplicate_delete_is_refused_while_in_flight() {
        let mut list = loaded(&[5]);
        assert!(list.request_delete(5));
        assert_eq!(list.confirm_delete(), Some(5));
        assert!(list.is_deleting(5));

        // Double tap while the first request is out
        assert!(!list.request_delete(5));
        assert_eq!(list.confirm_delete(), None);

        list.finish_delete(5, Err(TareasError::RequestFailed(Operation::DeleteNote(5))))
            .unwrap_err();
        assert!(!list.is_deleting(5));
        assert_eq!(list.notes().len(), 1);
        assert!(list.request_delete(5));
    }

    #[test]
    fn test_unknown_note_cannot_be_deleted() {
        let mut list = loaded(&[1]);
        assert!(!list.request_delete(99));
        assert_eq!(list.pending_delete(), None);
    }
}
