//! Simulated keyboard vocabulary.
//!
//! Text handed to `type_text` may embed special keys as `{Token}` (case
//! insensitive), e.g. `"A1{Enter}"` or `"{ArrowLeft}{Backspace}x"`. `{{` is a
//! literal brace; an unknown token is typed verbatim.

use cdp_adapter::KeyStroke;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Home,
    End,
}

impl SpecialKey {
    pub fn from_token(token: &str) -> Option<Self> {
        let key = match token.to_ascii_lowercase().as_str() {
            "arrowleft" => SpecialKey::ArrowLeft,
            "arrowright" => SpecialKey::ArrowRight,
            "arrowup" => SpecialKey::ArrowUp,
            "arrowdown" => SpecialKey::ArrowDown,
            "backspace" => SpecialKey::Backspace,
            "delete" | "del" => SpecialKey::Delete,
            "enter" | "return" => SpecialKey::Enter,
            "tab" => SpecialKey::Tab,
            "escape" | "esc" => SpecialKey::Escape,
            "home" => SpecialKey::Home,
            "end" => SpecialKey::End,
            _ => return None,
        };
        Some(key)
    }

    /// DOM key name, also used as the DOM `code`.
    pub fn name(&self) -> &'static str {
        match self {
            SpecialKey::ArrowLeft => "ArrowLeft",
            SpecialKey::ArrowRight => "ArrowRight",
            SpecialKey::ArrowUp => "ArrowUp",
            SpecialKey::ArrowDown => "ArrowDown",
            SpecialKey::Backspace => "Backspace",
            SpecialKey::Delete => "Delete",
            SpecialKey::Enter => "Enter",
            SpecialKey::Tab => "Tab",
            SpecialKey::Escape => "Escape",
            SpecialKey::Home => "Home",
            SpecialKey::End => "End",
        }
    }

    fn key_code(&self) -> i64 {
        match self {
            SpecialKey::Backspace => 8,
            SpecialKey::Tab => 9,
            SpecialKey::Enter => 13,
            SpecialKey::Escape => 27,
            SpecialKey::End => 35,
            SpecialKey::Home => 36,
            SpecialKey::ArrowLeft => 37,
            SpecialKey::ArrowUp => 38,
            SpecialKey::ArrowRight => 39,
            SpecialKey::ArrowDown => 40,
            SpecialKey::Delete => 46,
        }
    }

    pub fn stroke(&self) -> KeyStroke {
        KeyStroke::new(self.name(), self.name(), self.key_code())
    }
}

/// One unit of simulated keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyInput {
    Text(String),
    Key(SpecialKey),
}

/// Split a string with embedded `{Token}`s into text runs and special keys.
pub fn parse_key_sequence(input: &str) -> Vec<KeyInput> {
    let mut out = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('{') {
        text.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(stripped) = after.strip_prefix('{') {
            text.push('{');
            rest = stripped;
            continue;
        }

        match after.find('}') {
            Some(end) => {
                let token = &after[..end];
                match SpecialKey::from_token(token) {
                    Some(key) => {
                        if !text.is_empty() {
                            out.push(KeyInput::Text(std::mem::take(&mut text)));
                        }
                        out.push(KeyInput::Key(key));
                    }
                    None => {
                        text.push('{');
                        text.push_str(token);
                        text.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                text.push('{');
                rest = after;
            }
        }
    }

    text.push_str(rest);
    if !text.is_empty() {
        out.push(KeyInput::Text(text));
    }
    out
}
