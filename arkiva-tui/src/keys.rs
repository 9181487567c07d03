//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    /// Open the selected document in the details panel.
    Open,
    Close,
    /// Reopen the current document, e.g. after a failed generation.
    Reload,
    ToggleExpand,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(Action::Open),
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => Some(Action::Close),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(Action::MoveDown),
        KeyCode::Char('x') | KeyCode::Char(' ') => Some(Action::ToggleExpand),
        _ => None,
    }
}
