use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use sortscope_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// A key code plus the modifiers that must be held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Key to action table used by the input handler
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Build the lookup table from `[keymap]`. Invalid or conflicting
    /// entries are logged and skipped; the first action to claim a key keeps it.
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        let mut bind = |key: &str, action: Action| {
            let Some(binding) = parse_key_binding(key) else {
                warn!(key, ?action, "unparseable key binding, action left unbound");
                return;
            };
            match bindings.get(&binding) {
                Some(owner) => warn!(key, ?owner, ?action, "key already taken, binding skipped"),
                None => {
                    bindings.insert(binding, action);
                }
            }
        };

        bind(&config.quit, Action::Quit);
        bind(&config.generate, Action::Generate);
        bind(&config.start, Action::Start);
        bind(&config.toggle_pause, Action::TogglePause);
        bind(&config.next_algorithm, Action::NextAlgorithm);
        bind(&config.prev_algorithm, Action::PrevAlgorithm);
        bind(&config.size_up, Action::SizeUp);
        bind(&config.size_down, Action::SizeDown);
        bind(&config.speed_up, Action::SpeedUp);
        bind(&config.speed_down, Action::SpeedDown);
        bind(&config.custom_array, Action::CustomArray);
        bind(&config.explain, Action::Explain);
        bind(&config.quiz, Action::Quiz);
        bind(&config.help, Action::Help);

        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        // Arrow keys mirror the algorithm and speed bindings
        bindings.entry(KeyBinding::simple(KeyCode::Down)).or_insert(Action::NextAlgorithm);
        bindings.entry(KeyBinding::simple(KeyCode::Up)).or_insert(Action::PrevAlgorithm);
        bindings.entry(KeyBinding::simple(KeyCode::Right)).or_insert(Action::SpeedUp);
        bindings.entry(KeyBinding::simple(KeyCode::Left)).or_insert(Action::SpeedDown);
        bindings.insert(KeyBinding::simple(KeyCode::Esc), Action::ExitMode);

        Self { bindings }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// First key bound to an action, rendered back in config notation
    pub fn describe(&self, action: Action) -> Option<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(binding, _)| format_key_binding(binding))
            .collect();
        // single characters read better in hints than <Left>/<Down>
        keys.sort_by_key(|k| (k.starts_with('<'), k.clone()));
        keys.into_iter().next()
    }
}

/// Render a binding back to Vim-style notation
pub fn format_key_binding(binding: &KeyBinding) -> String {
    let name = match binding.code {
        KeyCode::Enter => "CR".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "BS".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Char(c) => {
            if binding.modifiers.contains(KeyModifiers::CONTROL) {
                return format!("<C-{}>", c);
            }
            return c.to_string();
        }
        other => format!("{:?}", other),
    };
    if binding.modifiers.contains(KeyModifiers::CONTROL) {
        format!("<C-{}>", name)
    } else if binding.modifiers.contains(KeyModifiers::SHIFT) {
        format!("<S-{}>", name)
    } else {
        format!("<{}>", name)
    }
}

/// Parse a binding from the `[keymap]` section.
///
/// A bare character binds that key, with uppercase letters meaning Shift
/// (`g`, `G`, `+`, `?`). Named keys and modifiers go in angle brackets:
/// `<CR>`, `<Space>`, `<Left>`, `<C-c>`, `<S-Tab>`.
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        return parse_bracketed(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_uppercase() {
        Some(KeyBinding::shift(KeyCode::Char(c)))
    } else {
        Some(KeyBinding::simple(KeyCode::Char(c)))
    }
}

/// Body of a `<...>` binding, with an optional `C-` or `S-` prefix
fn parse_bracketed(inner: &str) -> Option<KeyBinding> {
    let (modifiers, name) = match inner.split_once('-') {
        Some(("C" | "c", name)) if !name.is_empty() => (KeyModifiers::CONTROL, name),
        Some(("S" | "s", name)) if !name.is_empty() => (KeyModifiers::SHIFT, name),
        _ => (KeyModifiers::NONE, inner),
    };
    key_code(name).map(|code| KeyBinding::new(code, modifiers))
}

fn key_code(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" | "spc" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        "bs" | "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        lower => {
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                return (1..=12).contains(&n).then_some(KeyCode::F(n));
            }
            // `<C-c>` and friends
            let mut chars = lower.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c)
        }
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_bindings() {
        let config = KeymapConfig::default();
        assert_eq!(
            parse_key_binding(&config.generate),
            Some(KeyBinding::simple(KeyCode::Char('g')))
        );
        assert_eq!(
            parse_key_binding(&config.size_down),
            Some(KeyBinding::simple(KeyCode::Char('-')))
        );
        assert_eq!(
            parse_key_binding(&config.help),
            Some(KeyBinding::simple(KeyCode::Char('?')))
        );
        assert_eq!(parse_key_binding(&config.start), Some(KeyBinding::simple(KeyCode::Enter)));
        assert_eq!(
            parse_key_binding(&config.toggle_pause),
            Some(KeyBinding::simple(KeyCode::Char(' ')))
        );
    }

    #[test]
    fn test_parse_modifiers() {
        // uppercase letters carry Shift
        assert_eq!(parse_key_binding("S"), Some(KeyBinding::shift(KeyCode::Char('S'))));
        assert_eq!(parse_key_binding("<C-g>"), Some(KeyBinding::ctrl(KeyCode::Char('g'))));
        assert_eq!(parse_key_binding("<c-R>"), Some(KeyBinding::ctrl(KeyCode::Char('r'))));
        assert_eq!(parse_key_binding("<S-Tab>"), Some(KeyBinding::shift(KeyCode::Tab)));
        assert_eq!(parse_key_binding("<C-Right>"), Some(KeyBinding::ctrl(KeyCode::Right)));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key_binding(" <Enter> "), Some(KeyBinding::simple(KeyCode::Enter)));
        assert_eq!(parse_key_binding("<pgdn>"), Some(KeyBinding::simple(KeyCode::PageDown)));
        assert_eq!(parse_key_binding("<F5>"), Some(KeyBinding::simple(KeyCode::F(5))));
        // a literal minus is a key, not a modifier prefix
        assert_eq!(parse_key_binding("<->"), Some(KeyBinding::simple(KeyCode::Char('-'))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_key_binding(""), None);
        assert_eq!(parse_key_binding("gg"), None);
        assert_eq!(parse_key_binding("<F13>"), None);
        assert_eq!(parse_key_binding("<Hyper-x>"), None);
        assert_eq!(parse_key_binding("<C->"), None);
    }

    #[test]
    fn test_invalid_binding_leaves_action_unbound() {
        let config = KeymapConfig {
            explain: "<Nope>".to_string(),
            ..KeymapConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.describe(Action::Explain), None);
        assert_eq!(keymap.describe(Action::Quiz).as_deref(), Some("z"));
    }

    #[test]
    fn test_keymap_from_config() {
        let keymap = Keymap::from_config(&KeymapConfig::default());

        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Enter)),
            Some(&Action::Start)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char(' '))),
            Some(&Action::TogglePause)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('+'))),
            Some(&Action::SizeUp)
        );
        assert_eq!(
            keymap.get(&KeyBinding::ctrl(KeyCode::Char('c'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Down)),
            Some(&Action::NextAlgorithm)
        );
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            quiz: "g".to_string(),
            ..KeymapConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('g'))),
            Some(&Action::Generate)
        );
        assert_eq!(keymap.describe(Action::Quiz), None);
    }

    #[test]
    fn test_describe() {
        let keymap = Keymap::default();
        assert_eq!(keymap.describe(Action::Start).as_deref(), Some("<CR>"));
        assert_eq!(keymap.describe(Action::TogglePause).as_deref(), Some("<Space>"));
        assert_eq!(keymap.describe(Action::NextAlgorithm).as_deref(), Some("j"));
        assert_eq!(keymap.describe(Action::Quit).as_deref(), Some("q"));
    }
}
