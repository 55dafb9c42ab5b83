//! Event Handling - Keyboard input processing

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::section::Nav;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    ToggleEffects,
    Explode,
    Navigate(Nav),
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    None,
}

/// Map a key press to an action
pub fn action_for(key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    // Global keybindings
    match (key.modifiers, key.code) {
        // Quit: q or Ctrl+C
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,

        // Help: h or ?  ('h' would also be vim-left; help takes it)
        (KeyModifiers::NONE, KeyCode::Char('h')) => return Action::ToggleHelp,
        (_, KeyCode::Char('?')) => return Action::ToggleHelp,

        // Effects
        (KeyModifiers::NONE, KeyCode::Char('e')) => return Action::ToggleEffects,
        (KeyModifiers::NONE, KeyCode::Char('x')) => return Action::Explode,

        // Section navigation
        (KeyModifiers::NONE, KeyCode::Tab) => return Action::Navigate(Nav::Tab),
        (_, KeyCode::BackTab) => return Action::Navigate(Nav::ShiftTab),
        (KeyModifiers::NONE, KeyCode::Right | KeyCode::Char('l')) => {
            return Action::Navigate(Nav::Next)
        }
        (KeyModifiers::NONE, KeyCode::Left) => return Action::Navigate(Nav::Prev),

        _ => {}
    }

    // Viewport scrolling
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
        KeyCode::PageUp | KeyCode::Char('b') => Action::PageUp,
        KeyCode::PageDown | KeyCode::Char('f') | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::Top,
        KeyCode::End | KeyCode::Char('G') => Action::Bottom,
        _ => Action::None,
    }
}
