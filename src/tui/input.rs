use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single editable text value
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    masked: bool,
    multiline: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field whose content is never drawn (passwords)
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    /// Field where Enter inserts a line break
    pub fn multiline() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Apply an editing key; returns whether the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            KeyCode::Enter if self.multiline => {
                self.value.push('\n');
                true
            }
            _ => false,
        }
    }

    /// Text as it should be drawn
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
