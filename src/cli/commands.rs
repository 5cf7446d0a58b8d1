use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing::debug;

use super::{Commands, OutputFormat};
use crate::{
    api::{NewNote, Note},
    app::{init_config, AppState},
    screens::{note_preview, LoginScreen, NoteEditor, RegisterScreen},
    session::Route,
    utils::TareasError,
};

/// Note as printed by `--output-format json`
#[derive(Debug, Serialize)]
struct NoteOutput<'a> {
    id: i64,
    title: &'a str,
    description: &'a str,
    completed: bool,
}

impl<'a> From<&'a Note> for NoteOutput<'a> {
    fn from(note: &'a Note) -> Self {
        Self {
            id: note.id,
            title: &note.title,
            description: &note.description,
            completed: note.completed,
        }
    }
}

/// Turn a library error into the message the user sees
fn user_error(err: TareasError) -> anyhow::Error {
    debug!("Command failed: {:?}", err);
    anyhow!(err.user_message())
}

/// Handle commands that need neither configuration nor a session.
/// Returns `false` when the command still has to run.
pub fn handle_local_command(command: &Commands) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Tareas configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Show version information
pub fn show_version() {
    println!("Tareas v{}", env!("CARGO_PKG_VERSION"));
    println!("   Terminal client for the Tareas notes service");
}

/// Run a subcommand against the API, writing its output to `out`
pub async fn handle_command(
    command: &Commands,
    state: &AppState,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    if command.is_protected() && state.gate().determine_initial_route().await == Route::Login {
        bail!("Not signed in. Run `tareas login` first.");
    }

    match command {
        Commands::Init | Commands::Version => {
            handle_local_command(command)?;
        }
        Commands::Status => show_status(state, format, out).await?,
        Commands::Login { email, password } => {
            LoginScreen::new(state.api.clone(), state.session.clone())
                .submit(email, password)
                .await
                .map_err(user_error)?;
            writeln!(out, "{} Signed in as {}", "✓".green(), email)?;
        }
        Commands::Register { email, password } => {
            let alert = RegisterScreen::new(state.api.clone())
                .submit(email, password)
                .await
                .map_err(user_error)?;
            writeln!(out, "{} {}. {}", "✓".green(), alert.title, alert.message)?;
        }
        Commands::Logout => {
            state.session.sign_out().await.map_err(user_error)?;
            writeln!(out, "Signed out")?;
        }
        Commands::List => {
            let notes = state.api.list_notes().await.map_err(user_error)?;
            print_notes(&notes, state.config.ui.preview_chars, format, out)?;
        }
        Commands::Show { id } => {
            let note = state.api.get_note(*id).await.map_err(user_error)?;
            print_note(&note, format, out)?;
        }
        Commands::Create {
            title,
            description,
            completed,
        } => {
            let mut editor = NoteEditor::create();
            editor.draft = NewNote {
                title: title.clone(),
                description: description.clone(),
                completed: *completed,
            };
            if let Some(note) = editor.save(state.api.as_ref()).await.map_err(user_error)? {
                print_note(&note, format, out)?;
            }
        }
        Commands::Update {
            id,
            title,
            description,
            completed,
        } => {
            let mut editor = NoteEditor::open(state.api.as_ref(), *id)
                .await
                .map_err(user_error)?;
            if let Some(title) = title {
                editor.draft.title = title.clone();
            }
            if let Some(description) = description {
                editor.draft.description = description.clone();
            }
            if let Some(completed) = completed {
                editor.draft.completed = *completed;
            }
            if let Some(note) = editor.save(state.api.as_ref()).await.map_err(user_error)? {
                print_note(&note, format, out)?;
            }
        }
        Commands::Delete { id, yes } => {
            if !*yes && !confirm(&format!("Delete note {}?", id))? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            state.api.delete_note(*id).await.map_err(user_error)?;
            writeln!(out, "Deleted note {}", id)?;
        }
    }

    Ok(())
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_notes(notes: &[Note], preview_chars: usize, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let notes: Vec<NoteOutput> = notes.iter().map(NoteOutput::from).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&notes)?)?;
        }
        OutputFormat::Text => {
            if notes.is_empty() {
                writeln!(out, "No notes yet")?;
            }
            for note in notes {
                let mark = if note.completed { "[x]".green() } else { "[ ]".yellow() };
                writeln!(out, "{} {:>4}  {}", mark, note.id, note.title.bold())?;
                let preview = note_preview(&note.description, preview_chars);
                if !preview.is_empty() {
                    writeln!(out, "           {}", preview.dimmed())?;
                }
            }
        }
    }
    Ok(())
}

fn print_note(note: &Note, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&NoteOutput::from(note))?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} {}", format!("#{}", note.id).cyan(), note.title.bold())?;
            writeln!(out, "Completed: {}", if note.completed { "yes" } else { "no" })?;
            if !note.description.is_empty() {
                writeln!(out)?;
                writeln!(out, "{}", note.description)?;
            }
        }
    }
    Ok(())
}

/// Show endpoint, credential store and session status
async fn show_status(state: &AppState, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let base_url = state.api.base_url();
    let store = state.session.store_location();
    let signed_in = state.gate().determine_initial_route().await == Route::App;

    match format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "base_url": base_url,
                "credential_store": store,
                "signed_in": signed_in,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Tareas Status:")?;
            writeln!(out)?;
            writeln!(out, "  API: {}", base_url)?;
            writeln!(out, "  Credentials: {}", store)?;
            if signed_in {
                writeln!(out, "  [OK] Session: signed in")?;
            } else {
                writeln!(out, "  [WARNING] Session: not signed in")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LoginResponse, MockNotesApi};
    use crate::app::Config;
    use crate::session::SessionContext;
    use crate::storage::{CredentialStore, MemoryCredentialStore};
    use crate::utils::Operation;
    use std::sync::Arc;

    fn note(id: i64) -> Note {
        Note {
            id,
            title: format!("note {}", id),
            description: "<b>bold</b> text".to_string(),
            completed: id % 2 == 0,
        }
    }

    fn state(api: MockNotesApi, store: Arc<MemoryCredentialStore>) -> AppState {
        AppState::new(Config::default(), SessionContext::new(store), Arc::new(api))
    }

    fn signed_in() -> Arc<MemoryCredentialStore> {
        Arc::new(MemoryCredentialStore::with_entry("token", "abc123"))
    }

    async fn run(command: Commands, state: &AppState, format: OutputFormat) -> Result<String> {
        let mut out = Vec::new();
        handle_command(&command, state, format, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_protected_command_requires_session() {
        let mut api = MockNotesApi::new();
        api.expect_list_notes().times(0);
        let state = state(api, Arc::new(MemoryCredentialStore::new()));

        let err = run(Commands::List, &state, OutputFormat::Text).await.unwrap_err();
        assert!(err.to_string().contains("Not signed in"));
    }

    #[tokio::test]
    async fn test_list_as_json_uses_english_keys() {
        let mut api = MockNotesApi::new();
        api.expect_list_notes().returning(|| Ok(vec![note(1), note(2)]));
        let state = state(api, signed_in());

        let output = run(Commands::List, &state, OutputFormat::Json).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["title"], "note 1");
        assert_eq!(parsed[1]["completed"], true);
        assert!(parsed[0].get("titulo").is_none());
    }

    #[tokio::test]
    async fn test_list_as_text_shows_previews() {
        let mut api = MockNotesApi::new();
        api.expect_list_notes().returning(|| Ok(vec![note(3)]));
        let state = state(api, signed_in());

        let output = run(Commands::List, &state, OutputFormat::Text).await.unwrap();
        assert!(output.contains("note 3"));
        assert!(output.contains("bold text"));
        assert!(!output.contains("<b>"));
    }

    #[tokio::test]
    async fn test_login_failure_shows_user_message() {
        let mut api = MockNotesApi::new();
        api.expect_login()
            .returning(|_, _| Err(TareasError::RequestFailed(Operation::Login)));
        let store = Arc::new(MemoryCredentialStore::new());
        let state = state(api, store.clone());

        let err = run(
            Commands::Login {
                email: "a@b.co".to_string(),
                password: "longpassword".to_string(),
            },
            &state,
            OutputFormat::Text,
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "An error occurred while signing in.");
        assert_eq!(store.get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let mut api = MockNotesApi::new();
        api.expect_login().returning(|_, _| {
            Ok(LoginResponse {
                token: Some("t0k".to_string()),
            })
        });
        let store = Arc::new(MemoryCredentialStore::new());
        let state = state(api, store.clone());

        run(
            Commands::Login {
                email: "a@b.co".to_string(),
                password: "longpassword".to_string(),
            },
            &state,
            OutputFormat::Text,
        )
        .await
        .unwrap();

        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("t0k"));
    }

    #[tokio::test]
    async fn test_update_sends_only_given_fields() {
        let mut api = MockNotesApi::new();
        api.expect_get_note().returning(|id| Ok(note(id)));
        api.expect_update_note().times(1).returning(|id, patch| {
            assert_eq!(patch.title, None);
            assert_eq!(patch.completed, Some(true));
            Ok(Note {
                completed: true,
                ..note(id)
            })
        });
        let state = state(api, signed_in());

        let output = run(
            Commands::Update {
                id: 5,
                title: None,
                description: None,
                completed: Some(true),
            },
            &state,
            OutputFormat::Json,
        )
        .await
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], 5);
        assert_eq!(parsed["completed"], true);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let mut api = MockNotesApi::new();
        api.expect_create_note().times(0);
        let state = state(api, signed_in());

        let err = run(
            Commands::Create {
                title: " ".to_string(),
                description: String::new(),
                completed: false,
            },
            &state,
            OutputFormat::Text,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "The note title cannot be empty.");
    }

    #[tokio::test]
    async fn test_delete_with_yes_skips_prompt() {
        let mut api = MockNotesApi::new();
        api.expect_delete_note().times(1).returning(|_| Ok(()));
        let state = state(api, signed_in());

        let output = run(Commands::Delete { id: 9, yes: true }, &state, OutputFormat::Text)
            .await
            .unwrap();
        assert!(output.contains("Deleted note 9"));
    }

    #[tokio::test]
    async fn test_logout_removes_token() {
        let store = signed_in();
        let state = state(MockNotesApi::new(), store.clone());

        run(Commands::Logout, &state, OutputFormat::Text).await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_status_as_json() {
        let mut api = MockNotesApi::new();
        api.expect_base_url()
            .returning(|| "http://localhost:8080/api".to_string());
        let state = state(api, signed_in());

        let output = run(Commands::Status, &state, OutputFormat::Json).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["signed_in"], true);
        assert_eq!(parsed["credential_store"], "in-memory (not persisted)");
    }
}
