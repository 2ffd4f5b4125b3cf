//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::BreatheError;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop any session and quit.
    Quit,
    /// Start the selected preset from the top.
    Start,
    /// Pause or resume.
    TogglePause,
    /// Stop and record.
    Stop,
    /// Back to the first phase without recording.
    Reset,
    /// Select the next preset.
    Next,
    /// Select the previous preset.
    Previous,
    /// Show key bindings.
    Help,
}

/// Map a key press to an action.
#[must_use]
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Start),
        KeyCode::Char(' ' | 'p') => Some(Action::TogglePause),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Next),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Previous),
        KeyCode::Char('?') => Some(Action::Help),
        _ => None,
    }
}

/// Wait up to `timeout` for a terminal event.
///
/// Returns an action to take, or None if the timeout passed or the event
/// maps to nothing.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn next_action(timeout: Duration) -> Result<Option<Action>, BreatheError> {
    if event::poll(timeout).map_err(|e| BreatheError::Terminal(format!("Event poll failed: {e}")))? {
        if let Event::Key(key) =
            event::read().map_err(|e| BreatheError::Terminal(format!("Event read failed: {e}")))?
        {
            return Ok(action_for(key));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for(key(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(action_for(key(KeyCode::Enter)), Some(Action::Start));
        assert_eq!(action_for(key(KeyCode::Char('s'))), Some(Action::Stop));
        assert_eq!(action_for(key(KeyCode::Char('r'))), Some(Action::Reset));
        assert_eq!(action_for(key(KeyCode::Down)), Some(Action::Next));
        assert_eq!(action_for(key(KeyCode::Char('k'))), Some(Action::Previous));
        assert_eq!(action_for(key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(action_for(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_release_ignored() {
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(action_for(release), None);
    }
}
