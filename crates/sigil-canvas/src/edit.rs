//! Key handling for edit sessions
//!
//! While a fragment is being edited, keys that would otherwise drive drags
//! or global shortcuts (space, arrows) are consumed by the text surface.
//! Enter confirms the edit; Shift+Enter inserts a line break instead.
//!
//! There is no draft buffer: the text surface reports every change through
//! `update_content`, so ending a session never needs to save anything.

use serde::{Deserialize, Serialize};

/// Arrow key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

/// The keys the canvas distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum Key {
    Enter,
    Space,
    Arrow(ArrowKey),
    Character(char),
    Backspace,
    Escape,
    Other(String),
}

/// A key press with the modifier state the canvas cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    #[serde(default)]
    pub shift: bool,
}

impl KeyInput {
    /// Key press without modifiers
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Key press with Shift held
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// How a key press during an edit session is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOutcome {
    /// No edit session is active; the key belongs to other handlers
    Ignored,
    /// Handled by the text surface and must not propagate to drag or
    /// navigation handlers
    Consumed,
    /// The edit session ended; no line break is inserted
    EndEdit,
    /// A line break goes into the text and the session stays open
    LineBreak,
    /// Ordinary text input, handled by the text surface
    Text,
}

impl KeyOutcome {
    /// Whether the key may reach handlers outside the text surface
    pub fn propagates(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Route a key press that arrived while an edit session is active
pub fn route_edit_key(input: &KeyInput) -> KeyOutcome {
    match input.key {
        Key::Enter if input.shift => KeyOutcome::LineBreak,
        Key::Enter => KeyOutcome::EndEdit,
        Key::Space | Key::Arrow(_) => KeyOutcome::Consumed,
        _ => KeyOutcome::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_confirms() {
        assert_eq!(route_edit_key(&KeyInput::plain(Key::Enter)), KeyOutcome::EndEdit);
    }

    #[test]
    fn test_shift_enter_breaks_line() {
        assert_eq!(
            route_edit_key(&KeyInput::shifted(Key::Enter)),
            KeyOutcome::LineBreak
        );
    }

    #[test]
    fn test_space_and_arrows_are_consumed() {
        assert_eq!(route_edit_key(&KeyInput::plain(Key::Space)), KeyOutcome::Consumed);
        for dir in [ArrowKey::Up, ArrowKey::Down, ArrowKey::Left, ArrowKey::Right] {
            let outcome = route_edit_key(&KeyInput::shifted(Key::Arrow(dir)));
            assert_eq!(outcome, KeyOutcome::Consumed);
            assert!(!outcome.propagates());
        }
    }

    #[test]
    fn test_other_keys_are_text() {
        assert_eq!(
            route_edit_key(&KeyInput::plain(Key::Character('k'))),
            KeyOutcome::Text
        );
        assert_eq!(route_edit_key(&KeyInput::plain(Key::Escape)), KeyOutcome::Text);
        assert_eq!(route_edit_key(&KeyInput::plain(Key::Backspace)), KeyOutcome::Text);
    }

    #[test]
    fn test_key_input_from_json() {
        let input: KeyInput =
            serde_json::from_str(r#"{"key":{"key":"arrow","value":"left"}}"#).unwrap();
        assert_eq!(input, KeyInput::plain(Key::Arrow(ArrowKey::Left)));
    }
}
