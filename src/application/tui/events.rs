use crate::application::Screen;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How a view loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewResult {
    /// User quit (q, Esc, Ctrl+C, Ctrl+D)
    Exited,
    /// User asked for another screen
    SwitchTo(Screen),
}

/// One-line message shown under a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// What a view should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Status(Status),
    ToggleHelp,
    Exit(ViewResult),
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('q'), _)
            | (KeyCode::Esc, _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL)
    )
}

#[cfg(test)]
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Char('q'))));
        assert!(is_quit_key(&key(KeyCode::Esc)));
        assert!(is_quit_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit_key(&key(KeyCode::Char('c'))));
    }
}
