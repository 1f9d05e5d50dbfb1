use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Select,
    Clear,
    Next,
    Prev,
    Help,
    Quit,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Self::Select,
        Self::Clear,
        Self::Next,
        Self::Prev,
        Self::Help,
        Self::Quit,
    ];

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "select" => Some(Self::Select),
            "clear" => Some(Self::Clear),
            "next" => Some(Self::Next),
            "prev" | "previous" => Some(Self::Prev),
            "help" => Some(Self::Help),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }

    pub fn hint_text(&self) -> &'static str {
        match self {
            Self::Select => "open",
            Self::Clear => "clear",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
}

/// Printable keys are reserved for the input line, so every default binding
/// is either a named key or a Ctrl chord.
pub fn default_bindings() -> HashMap<KeyEvent, Action> {
    let mut m = HashMap::new();
    m.insert(key(KeyCode::Enter), Action::Select);
    m.insert(key(KeyCode::Esc), Action::Clear);
    m.insert(key(KeyCode::Down), Action::Next);
    m.insert(key(KeyCode::Tab), Action::Next);
    m.insert(ctrl(KeyCode::Char('n')), Action::Next);
    m.insert(key(KeyCode::Up), Action::Prev);
    m.insert(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), Action::Prev);
    m.insert(ctrl(KeyCode::Char('p')), Action::Prev);
    m.insert(key(KeyCode::F(1)), Action::Help);
    m.insert(ctrl(KeyCode::Char('c')), Action::Quit);
    m
}
