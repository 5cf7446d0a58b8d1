use tracing::info;

use crate::api::{NewNote, Note, NotePatch, NotesApi};
use crate::utils::{TareasError, ValidationError};

/// Whether the editor creates a note or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(Note),
}

/// Create/edit note form
#[derive(Debug, Clone)]
pub struct NoteEditor {
    mode: EditorMode,
    pub draft: NewNote,
    saving: bool,
}

impl NoteEditor {
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            draft: NewNote {
                title: String::new(),
                description: String::new(),
                completed: false,
            },
            saving: false,
        }
    }

    pub fn edit(note: Note) -> Self {
        let draft = NewNote {
            title: note.title.clone(),
            description: note.description.clone(),
            completed: note.completed,
        };
        Self {
            mode: EditorMode::Edit(note),
            draft,
            saving: false,
        }
    }

    /// Fetch a note and open it for editing
    pub async fn open(api: &dyn NotesApi, id: i64) -> Result<Self, TareasError> {
        Ok(Self::edit(api.get_note(id).await?))
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn note_id(&self) -> Option<i64> {
        match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(note) => Some(note.id),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Lock the form for a save. `Ok(false)` when a save is already running.
    pub fn begin_save(&mut self) -> Result<bool, ValidationError> {
        if self.saving {
            return Ok(false);
        }
        if self.draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.saving = true;
        Ok(true)
    }

    /// Send the draft: create for new notes, a partial update for edits
    pub async fn submit(&self, api: &dyn NotesApi) -> Result<Note, TareasError> {
        match &self.mode {
            EditorMode::Create => api.create_note(&self.draft).await,
            EditorMode::Edit(original) => {
                let patch = NotePatch::diff(original, &self.draft);
                if patch.is_empty() {
                    return Ok(original.clone());
                }
                api.update_note(original.id, &patch).await
            }
        }
    }

    /// Unlock the form; a successful save switches the editor to the stored note
    pub fn finish_save(&mut self, result: Result<Note, TareasError>) -> Result<Note, TareasError> {
        self.saving = false;
        let note = result?;
        info!("Saved note {}", note.id);
        *self = Self::edit(note.clone());
        Ok(note)
    }

    /// Validate, send and apply in one go
    pub async fn save(&mut self, api: &dyn NotesApi) -> Result<Option<Note>, TareasError> {
        if !self.begin_save()? {
            return Ok(None);
        }
        let result = self.submit(api).await;
        self.finish_save(result).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockNotesApi;
    use crate::utils::Operation;
    use pretty_assertions::assert_eq;

    fn stored(id: i64) -> Note {
        Note {
            id,
            title: "x".to_string(),
            description: "y".to_string(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn test_create_returns_server_note() {
        let mut api = MockNotesApi::new();
        api.expect_create_note().times(1).returning(|draft| {
            Ok(Note {
                id: 42,
                title: draft.title.clone(),
                description: draft.description.clone(),
                completed: draft.completed,
            })
        });

        let mut editor = NoteEditor::create();
        editor.draft.title = "x".to_string();
        editor.draft.description = "y".to_string();

        let saved = editor.save(&api).await.unwrap();
        assert_eq!(saved, Some(stored(42)));
        assert_eq!(editor.note_id(), Some(42));
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected_before_any_call() {
        let mut api = MockNotesApi::new();
        api.expect_create_note().times(0);

        let mut editor = NoteEditor::create();
        editor.draft.title = "   ".to_string();

        let err = editor.save(&api).await.unwrap_err();
        assert!(matches!(err, TareasError::Validation(ValidationError::EmptyTitle)));
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn test_edit_sends_only_changes() {
        let mut api = MockNotesApi::new();
        api.expect_get_note().times(1).returning(|id| Ok(stored(id)));
        api.expect_update_note().times(1).returning(|id, patch| {
            assert_eq!(patch.completed, Some(true));
            assert_eq!(patch.title, None);
            Ok(Note {
                completed: true,
                ..stored(id)
            })
        });

        let mut editor = NoteEditor::open(&api, 7).await.unwrap();
        editor.draft.completed = true;

        let saved = editor.save(&api).await.unwrap().unwrap();
        assert!(saved.completed);
    }

    #[tokio::test]
    async fn test_unchanged_edit_skips_the_request() {
        let mut api = MockNotesApi::new();
        api.expect_update_note().times(0);

        let mut editor = NoteEditor::edit(stored(3));
        assert_eq!(editor.save(&api).await.unwrap(), Some(stored(3)));
    }

    #[tokio::test]
    async fn test_failed_save_unlocks_the_form() {
        let mut api = MockNotesApi::new();
        api.expect_create_note()
            .returning(|_| Err(TareasError::RequestFailed(Operation::CreateNote)));

        let mut editor = NoteEditor::create();
        editor.draft.title = "x".to_string();

        let err = editor.save(&api).await.unwrap_err();
        assert_eq!(err.user_message(), "Could not create the note.");
        assert!(!editor.is_saving());
        assert_eq!(editor.note_id(), None);
    }

    #[test]
    fn test_second_save_is_refused_while_saving() {
        let mut editor = NoteEditor::create();
        editor.draft.title = "x".to_string();

        assert_eq!(editor.begin_save(), Ok(true));
        assert_eq!(editor.begin_save(), Ok(false));
    }
}
