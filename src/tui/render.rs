use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState as ListCursor, Paragraph, Wrap},
    Frame,
};

use super::app::{App, AuthField, AuthForm, EditorField, EditorView, NotesView, View};
use super::input::TextField;
use crate::screens::{note_preview, Alert, EditorMode, ListState};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Header
                Constraint::Min(6),    // Screen
                Constraint::Length(1), // Status bar
            ],
        )
        .split(frame.area());

    render_header(frame, chunks[0], app);

    match &app.view {
        View::Login(form) => render_auth(frame, chunks[1], form, "Sign in"),
        View::Register(form) => render_auth(frame, chunks[1], form, "Create account"),
        View::Notes(view) => render_notes(frame, chunks[1], view, app.preview_chars()),
        View::Editor(view) => render_editor(frame, chunks[1], view),
    }

    render_status_bar(frame, chunks[2], app);

    if let View::Notes(view) = &app.view {
        if let Some(id) = view.list.pending_delete() {
            render_delete_confirm(frame, id);
        }
    }
    if let Some(alert) = &app.alert {
        render_alert(frame, alert);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Tareas",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(app.base_url(), Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn render_field(frame: &mut Frame, area: Rect, field: &TextField, title: &str, focused: bool) {
    let widget = Paragraph::new(field.display())
        .block(field_block(title, focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_auth(frame: &mut Frame, area: Rect, form: &AuthForm, title: &str) {
    let area = centered_rect(60, 12, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    render_field(frame, rows[0], &form.email, "Email", form.focus == AuthField::Email);
    render_field(frame, rows[1], &form.password, "Password", form.focus == AuthField::Password);

    let hint = if form.submitting {
        Span::styled("Please wait...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Enter: submit | Tab: next field", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), rows[2]);
}

fn render_notes(frame: &mut Frame, area: Rect, view: &NotesView, preview_chars: usize) {
    let block = Block::default()
        .title(" My notes ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let notes = match view.list.state() {
        ListState::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }
        ListState::Error(message) => {
            let error = Paragraph::new(vec![
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
                Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
            ])
            .block(block);
            frame.render_widget(error, area);
            return;
        }
        ListState::Loaded(notes) if notes.is_empty() => {
            let empty = Paragraph::new("You have no notes yet. Press n to create one.")
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }
        ListState::Loaded(notes) => notes,
    };

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let (mark, color) = if note.completed {
                ("[x] ", Color::Green)
            } else {
                ("[ ] ", Color::Yellow)
            };
            let mut title = vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::styled(note.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            ];
            if view.list.is_deleting(note.id) {
                title.push(Span::styled(" (deleting)", Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(vec![
                Line::from(title),
                Line::from(Span::styled(
                    format!("    {}", note_preview(&note.description, preview_chars)),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut cursor = ListCursor::default().with_selected(Some(view.selected));
    frame.render_stateful_widget(list, area, &mut cursor);
}

fn render_editor(frame: &mut Frame, area: Rect, view: &EditorView) {
    let Some(editor) = &view.editor else {
        let loading = Paragraph::new("Loading note...")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    };

    let title = match editor.mode() {
        EditorMode::Create => " New note ".to_string(),
        EditorMode::Edit(note) => format!(" Edit note {} ", note.id),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        )
        .split(inner);

    render_field(frame, rows[0], &view.title, "Title", view.focus == EditorField::Title);
    render_field(
        frame,
        rows[1],
        &view.description,
        "Description",
        view.focus == EditorField::Description,
    );

    let checkbox = if editor.draft.completed { "[x]" } else { "[ ]" };
    let style = if view.focus == EditorField::Completed {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{} Completed", checkbox), style)),
        rows[2],
    );

    let hint = if editor.is_saving() {
        Span::styled("Saving...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "Ctrl+S: save | Tab: next field | Space: toggle completed | Esc: back",
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), rows[3]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let keys = match &app.view {
        View::Login(_) => "Ctrl+R: register | Esc: quit",
        View::Register(_) => "Esc: back to sign in",
        View::Notes(_) => "n: new | e: edit | d: delete | r: reload | l: sign out | q: quit",
        View::Editor(_) => "Esc: back",
    };

    let status = app.status_message.as_deref().unwrap_or("Ready");
    let status_bar = Paragraph::new(Line::from(vec![
        Span::raw(format!(" {} ", status)),
        Span::raw("| "),
        Span::styled(keys, Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ]))
    .style(Style::default().bg(Color::Black))
    .block(Block::default());

    frame.render_widget(status_bar, area);
}

fn render_delete_confirm(frame: &mut Frame, id: i64) {
    let area = centered_rect(50, 5, frame.area());
    let popup = Paragraph::new(vec![
        Line::from(format!("Delete note {}?", id)),
        Line::from(Span::styled("y: delete | n: cancel", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn render_alert(frame: &mut Frame, alert: &Alert) {
    let area = centered_rect(60, 7, frame.area());
    let color = if alert.title == "Error" { Color::Red } else { Color::Green };
    let popup = Paragraph::new(vec![
        Line::from(alert.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(format!(" {} ", alert.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Rectangle of `percent_x` width and `height` rows centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((area.height - height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ],
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ],
        )
        .split(vertical[1])[1]
}
