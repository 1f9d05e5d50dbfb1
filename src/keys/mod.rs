pub mod parser;
pub mod preset;

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{Result, RustlinksError};
use preset::{default_bindings, Action};

pub struct KeybindingMap {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeybindingMap {
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self> {
        let mut bindings = default_bindings();

        for (action_name, key_str) in overrides {
            let action = Action::from_name(action_name)
                .ok_or_else(|| RustlinksError::Config(format!("Unknown action: {}", action_name)))?;
            let key_event = parser::parse_key(key_str)?;
            if is_text_key(&key_event) {
                return Err(RustlinksError::Config(format!(
                    "Binding '{}' for {} would swallow typed text",
                    key_str, action_name
                )));
            }

            bindings.retain(|_, v| v != &action);
            bindings.insert(key_event, action);
        }

        Ok(Self { bindings })
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings.get(key).copied()
    }

    pub fn hints(&self) -> Vec<(String, &'static str)> {
        let mut hints = Vec::new();
        for action in Action::ALL {
            // Prefer the shortest key label when several keys share an action
            let key_label = self
                .bindings
                .iter()
                .filter(|(_, a)| **a == action)
                .map(|(k, _)| format_key_event(k))
                .min_by_key(|label| (label.chars().count(), label.clone()));
            if let Some(label) = key_label {
                hints.push((label, action.hint_text()));
            }
        }
        hints
    }
}

/// Keys the input line needs for typing.
pub fn is_text_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_)) && key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

fn format_key_event(key: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) && key.code != KeyCode::BackTab {
        parts.push("Shift".to_string());
    }

    let key_str = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };
    parts.push(key_str);

    parts.join("+")
}
