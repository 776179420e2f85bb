use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Generate,
    Start,
    TogglePause,
    NextAlgorithm,
    PrevAlgorithm,
    SizeUp,
    SizeDown,
    SpeedUp,
    SpeedDown,
    CustomArray,
    Explain,
    Quiz,
    Help,
    Answer(usize), // 1-9 in quiz mode, zero-based
    ExitMode,
    Confirm,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    // Ctrl+C quits from every mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.mode {
        Mode::CustomInput(_) => handle_input_mode(key),
        Mode::Help => Action::ExitMode,
        Mode::Explanation => handle_popup_mode(key),
        Mode::Quiz => match key.code {
            KeyCode::Char(c @ '1'..='9') => Action::Answer(c as usize - '1' as usize),
            _ => handle_popup_mode(key),
        },
        Mode::Normal => lookup(key, keymap),
    }
}

/// Keymap lookup. Shifted punctuation like '+' or '?' arrives with SHIFT
/// set, so retry without it for character keys.
fn lookup(key: KeyEvent, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);
    if let Some(action) = keymap.get(&binding) {
        return *action;
    }
    if let KeyCode::Char(c) = key.code {
        if key.modifiers == KeyModifiers::SHIFT && !c.is_ascii_alphabetic() {
            if let Some(action) = keymap.get(&KeyBinding::simple(key.code)) {
                return *action;
            }
        }
    }
    Action::None
}

/// Handle key events while typing a custom array
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::ExitMode,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Handle key events while an explanation or quiz popup is open
fn handle_popup_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Action::ExitMode,
        _ => Action::None,
    }
}
