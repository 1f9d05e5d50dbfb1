use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{Result, RustlinksError};

/// Parse a binding such as `Ctrl+Shift+k`, `Esc` or `F1`.
pub fn parse_key(input: &str) -> Result<KeyEvent> {
    let parts: Vec<&str> = input.split('+').map(str::trim).collect();
    let (key_part, modifier_parts) = parts
        .split_last()
        .filter(|(last, _)| !last.is_empty())
        .ok_or_else(|| RustlinksError::Config(format!("No key code found in '{}'", input)))?;

    let mut modifiers = KeyModifiers::NONE;
    for part in modifier_parts {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => {
                return Err(RustlinksError::Config(format!(
                    "Unknown modifier '{}' in key '{}'",
                    part, input
                )))
            }
        };
    }

    let code = parse_key_code(key_part)?;
    // crossterm reports Shift+Tab as BackTab with SHIFT set
    if code == KeyCode::BackTab {
        modifiers |= KeyModifiers::SHIFT;
    }
    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    let lower = s.to_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" | "↑" => KeyCode::Up,
        "down" | "↓" => KeyCode::Down,
        "left" | "←" => KeyCode::Left,
        "right" | "→" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') => {
            let num: u8 = f[1..]
                .parse()
                .map_err(|_| RustlinksError::Config(format!("Invalid function key: {}", s)))?;
            if !(1..=12).contains(&num) {
                return Err(RustlinksError::Config(format!(
                    "Function key out of range: F{}",
                    num
                )));
            }
            KeyCode::F(num)
        }
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return Err(RustlinksError::Config(format!("Unknown key: {}", s))),
            }
        }
    };
    Ok(code)
}
