use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use super::input::TextField;
use super::scope::{RequestScope, ScreenEvent, TaskResult};
use crate::app::AppState;
use crate::constants::UI_EVENT_CHANNEL_SIZE;
use crate::screens::{Alert, LoginScreen, NoteEditor, NotesList, RegisterScreen};
use crate::session::Route;
use crate::utils::TareasError;

/// Field focused on the login/register form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
}

/// Login and register form
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub email: TextField,
    pub password: TextField,
    pub focus: AuthField,
    pub submitting: bool,
}

impl AuthForm {
    fn new() -> Self {
        Self {
            email: TextField::new(),
            password: TextField::masked(),
            focus: AuthField::Email,
            submitting: false,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Email,
        };
    }

    fn focused(&mut self) -> &mut TextField {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }
}

/// Notes list screen
#[derive(Debug)]
pub struct NotesView {
    pub list: NotesList,
    pub selected: usize,
}

impl NotesView {
    pub fn selected_id(&self) -> Option<i64> {
        self.list.notes().get(self.selected).map(|note| note.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.list.notes().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// Field focused in the note editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Description,
    Completed,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Completed,
            Self::Completed => Self::Title,
        }
    }
}

/// Create/edit note screen; `editor` is `None` while the note loads
#[derive(Debug)]
pub struct EditorView {
    pub editor: Option<NoteEditor>,
    pub title: TextField,
    pub description: TextField,
    pub focus: EditorField,
}

impl EditorView {
    fn loading() -> Self {
        Self {
            editor: None,
            title: TextField::new(),
            description: TextField::multiline(),
            focus: EditorField::Title,
        }
    }

    fn ready(editor: NoteEditor) -> Self {
        let mut view = Self::loading();
        view.title.set(editor.draft.title.clone());
        view.description.set(editor.draft.description.clone());
        view.editor = Some(editor);
        view
    }
}

/// Screen on display
#[derive(Debug)]
pub enum View {
    Login(AuthForm),
    Register(AuthForm),
    Notes(NotesView),
    Editor(EditorView),
}

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Login,
    Register,
    Notes,
    NewNote,
    EditNote(i64),
}

impl From<Route> for Target {
    fn from(route: Route) -> Self {
        match route {
            Route::App => Self::Notes,
            Route::Login => Self::Login,
        }
    }
}

/// Application state
pub struct App {
    /// Screen on display
    pub view: View,
    /// Modal alert, dismissed by any key
    pub alert: Option<Alert>,
    /// Is the app running?
    pub running: bool,
    /// Status message
    pub status_message: Option<String>,
    state: AppState,
    scope: RequestScope,
    events: mpsc::Receiver<ScreenEvent>,
}

impl App {
    /// Create the app on the route chosen by the session gate.
    /// Must be called inside a tokio runtime.
    pub fn new(state: AppState, initial: Route) -> Self {
        let (tx, events) = mpsc::channel(UI_EVENT_CHANNEL_SIZE);
        let mut app = Self {
            view: View::Login(AuthForm::new()),
            alert: None,
            running: true,
            status_message: None,
            state,
            scope: RequestScope::new(tx),
            events,
        };
        app.navigate(initial.into());
        app
    }

    pub fn preview_chars(&self) -> usize {
        self.state.config.ui.preview_chars
    }

    pub fn base_url(&self) -> String {
        self.state.api.base_url()
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    fn show_error(&mut self, err: &TareasError) {
        self.alert = Some(Alert::error(err));
    }

    /// Replace the current screen; requests of the old screen are cancelled
    pub fn navigate(&mut self, target: Target) {
        self.scope.renew();
        self.status_message = None;
        debug!("Navigating to {:?}", target);

        self.view = match target {
            Target::Login => View::Login(AuthForm::new()),
            Target::Register => View::Register(AuthForm::new()),
            Target::Notes => {
                // Every visit refetches
                let api = self.state.api.clone();
                self.scope
                    .spawn(async move { TaskResult::NotesLoaded(api.list_notes().await) });
                View::Notes(NotesView {
                    list: NotesList::new(),
                    selected: 0,
                })
            }
            Target::NewNote => View::Editor(EditorView::ready(NoteEditor::create())),
            Target::EditNote(id) => {
                let api = self.state.api.clone();
                self.scope
                    .spawn(async move { TaskResult::NoteOpened(api.get_note(id).await) });
                View::Editor(EditorView::loading())
            }
        };
    }

    /// Process a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if let Some(alert) = self.alert.take() {
            if let Some(route) = alert.then {
                self.navigate(route.into());
            }
            return;
        }

        match &self.view {
            View::Login(_) | View::Register(_) => self.handle_auth_key(key),
            View::Notes(_) => self.handle_notes_key(key),
            View::Editor(_) => self.handle_editor_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) {
        let is_login = matches!(self.view, View::Login(_));
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('r') if ctrl && is_login => return self.navigate(Target::Register),
            KeyCode::Char('l') if ctrl && !is_login => return self.navigate(Target::Login),
            KeyCode::Esc if is_login => return self.quit(),
            KeyCode::Esc => return self.navigate(Target::Login),
            _ => {}
        }

        let (View::Login(form) | View::Register(form)) = &mut self.view else {
            return;
        };

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_focus(),
            KeyCode::Enter => {
                if form.submitting {
                    return;
                }
                form.submitting = true;
                let email = form.email.value().to_string();
                let password = form.password.value().to_string();

                if is_login {
                    let screen = LoginScreen::new(self.state.api.clone(), self.state.session.clone());
                    self.scope.spawn(async move {
                        TaskResult::LoggedIn(screen.submit(&email, &password).await)
                    });
                } else {
                    let screen = RegisterScreen::new(self.state.api.clone());
                    self.scope.spawn(async move {
                        TaskResult::Registered(screen.submit(&email, &password).await)
                    });
                }
            }
            _ => {
                form.focused().handle_key(key);
            }
        }
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        let View::Notes(view) = &mut self.view else {
            return;
        };

        if view.list.pending_delete().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Some(id) = view.list.confirm_delete() {
                        let api = self.state.api.clone();
                        self.scope.spawn(async move {
                            TaskResult::NoteDeleted(id, api.delete_note(id).await)
                        });
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => view.list.cancel_delete(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Down | KeyCode::Char('j') => {
                if view.selected + 1 < view.list.notes().len() {
                    view.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                view.selected = view.selected.saturating_sub(1);
            }
            KeyCode::Char('r') => self.navigate(Target::Notes),
            KeyCode::Char('n') => self.navigate(Target::NewNote),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = view.selected_id() {
                    self.navigate(Target::EditNote(id));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = view.selected_id() {
                    if !view.list.request_delete(id) {
                        self.set_status(format!("Note {} is already being deleted", id));
                    }
                }
            }
            KeyCode::Char('l') => {
                // Navigation must not abandon a sign-out halfway
                let session = self.state.session.clone();
                self.scope
                    .spawn_detached(async move { TaskResult::SignedOut(session.sign_out().await) });
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let View::Editor(view) = &mut self.view else {
            return;
        };

        if key.code == KeyCode::Esc {
            return self.navigate(Target::Notes);
        }
        let Some(editor) = view.editor.as_mut() else {
            return;
        };

        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            editor.draft.title = view.title.value().to_string();
            editor.draft.description = view.description.value().to_string();

            match editor.begin_save() {
                Ok(true) => {
                    let pending = editor.clone();
                    let api = self.state.api.clone();
                    self.scope.spawn(async move {
                        TaskResult::NoteSaved(pending.submit(api.as_ref()).await)
                    });
                }
                Ok(false) => {}
                Err(invalid) => self.show_error(&invalid.into()),
            }
            return;
        }

        match (key.code, view.focus) {
            (KeyCode::Tab, focus) => view.focus = focus.next(),
            (KeyCode::Char(' '), EditorField::Completed) | (KeyCode::Enter, EditorField::Completed) => {
                editor.draft.completed = !editor.draft.completed;
            }
            (_, EditorField::Title) => {
                view.title.handle_key(key);
            }
            (_, EditorField::Description) => {
                view.description.handle_key(key);
            }
            _ => {}
        }
    }

    /// Apply a finished request; results from a previous screen are dropped
    pub fn handle_event(&mut self, event: ScreenEvent) {
        if !self.scope.is_current(&event) {
            debug!("Discarding result for screen {}", event.epoch);
            return;
        }

        match event.result {
            TaskResult::LoggedIn(result) => match result {
                Ok(route) => self.navigate(route.into()),
                Err(err) => {
                    if let View::Login(form) = &mut self.view {
                        form.submitting = false;
                    }
                    self.show_error(&err);
                }
            },
            TaskResult::Registered(result) => {
                if let View::Register(form) = &mut self.view {
                    form.submitting = false;
                }
                match result {
                    Ok(alert) => self.alert = Some(alert),
                    Err(err) => self.show_error(&err),
                }
            }
            TaskResult::NotesLoaded(result) => {
                if let View::Notes(view) = &mut self.view {
                    view.list.finish_load(result);
                    view.clamp_selection();
                }
            }
            TaskResult::NoteDeleted(id, result) => {
                let outcome = match &mut self.view {
                    View::Notes(view) => {
                        let outcome = view.list.finish_delete(id, result);
                        view.clamp_selection();
                        outcome
                    }
                    _ => Ok(()),
                };
                match outcome {
                    Ok(()) => self.set_status(format!("Deleted note {}", id)),
                    Err(err) => self.show_error(&err),
                }
            }
            TaskResult::NoteOpened(result) => match result {
                Ok(note) => self.view = View::Editor(EditorView::ready(NoteEditor::edit(note))),
                Err(err) => self.alert = Some(Alert::error(&err).then(Route::App)),
            },
            TaskResult::NoteSaved(result) => {
                let outcome = match &mut self.view {
                    View::Editor(EditorView {
                        editor: Some(editor),
                        ..
                    }) => editor.finish_save(result),
                    _ => result,
                };
                match outcome {
                    Ok(_) => self.navigate(Target::Notes),
                    Err(err) => self.show_error(&err),
                }
            }
            TaskResult::SignedOut(result) => match result {
                Ok(()) => self.navigate(Target::Login),
                Err(err) => self.show_error(&err),
            },
        }
    }

    /// Apply every result that has arrived, without waiting
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for the next request result and apply it
    pub async fn process_next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }
}
