use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
}

/// Keys designated for turning pages forward and backward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    next: Vec<KeyCode>,
    previous: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: vec![KeyCode::Right, KeyCode::Char('l')],
            previous: vec![KeyCode::Left, KeyCode::Char('h')],
        }
    }
}

impl KeyBindings {
    pub fn new(next: Vec<KeyCode>, previous: Vec<KeyCode>) -> Self {
        Self { next, previous }
    }

    /// Build bindings from key names as written in the config file.
    ///
    /// Unknown names are skipped; a direction left without any key falls back
    /// to its default keys.
    pub fn from_names(next: &[String], previous: &[String]) -> Self {
        let defaults = Self::default();
        let next = parse_names(next).unwrap_or(defaults.next);
        let previous = parse_names(previous).unwrap_or(defaults.previous);
        Self { next, previous }
    }

    pub fn next_keys(&self) -> &[KeyCode] {
        &self.next
    }

    pub fn previous_keys(&self) -> &[KeyCode] {
        &self.previous
    }

    pub fn command_for(&self, key: &KeyEvent) -> Option<NavCommand> {
        if key.kind == KeyEventKind::Release
            || key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        if self.next.contains(&key.code) {
            Some(NavCommand::Next)
        } else if self.previous.contains(&key.code) {
            Some(NavCommand::Previous)
        } else {
            None
        }
    }

    /// Human readable key list for help lines, e.g. "→/l"
    pub fn describe(keys: &[KeyCode]) -> String {
        keys.iter().map(key_label).collect::<Vec<_>>().join("/")
    }
}

fn parse_names(names: &[String]) -> Option<Vec<KeyCode>> {
    let codes: Vec<KeyCode> = names
        .iter()
        .filter_map(|name| {
            let code = parse_key_code(name);
            if code.is_none() {
                warn!("Ignoring unknown key name in config: {name:?}");
            }
            code
        })
        .collect();
    if codes.is_empty() { None } else { Some(codes) }
}

pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    // A bare " " binds the space bar; anything else ignores surrounding blanks
    let name = if name.trim().is_empty() { name } else { name.trim() };
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "right" => KeyCode::Right,
        "left" => KeyCode::Left,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        _ => return None,
    };
    Some(code)
}

fn key_label(code: &KeyCode) -> String {
    match code {
        KeyCode::Right => "→".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_use_arrows_and_vim_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.command_for(&press(KeyCode::Right)), Some(NavCommand::Next));
        assert_eq!(bindings.command_for(&press(KeyCode::Char('l'))), Some(NavCommand::Next));
        assert_eq!(bindings.command_for(&press(KeyCode::Left)), Some(NavCommand::Previous));
        assert_eq!(bindings.command_for(&press(KeyCode::Char('h'))), Some(NavCommand::Previous));
        assert_eq!(bindings.command_for(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn releases_and_chords_do_not_navigate() {
        let bindings = KeyBindings::default();
        let release = KeyEvent {
            code: KeyCode::Right,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::empty(),
        };
        assert_eq!(bindings.command_for(&release), None);
        let ctrl = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(bindings.command_for(&ctrl), None);
    }

    #[test]
    fn parses_named_and_single_char_keys() {
        assert_eq!(parse_key_code("Right"), Some(KeyCode::Right));
        assert_eq!(parse_key_code("pagedown"), Some(KeyCode::PageDown));
        assert_eq!(parse_key_code("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key_code("n"), Some(KeyCode::Char('n')));
        assert_eq!(parse_key_code("Hyper"), None);
    }

    #[test]
    fn padded_names_are_trimmed() {
        assert_eq!(parse_key_code(" l"), Some(KeyCode::Char('l')));
        assert_eq!(parse_key_code("  PageUp "), Some(KeyCode::PageUp));
        assert_eq!(parse_key_code(" "), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key_code(""), None);
    }

    #[test]
    fn unknown_names_fall_back_to_defaults() {
        let bindings = KeyBindings::from_names(&["Bogus".to_string()], &["p".to_string()]);
        assert_eq!(bindings.next_keys(), KeyBindings::default().next_keys());
        assert_eq!(bindings.previous_keys(), &[KeyCode::Char('p')]);
    }

    #[test]
    fn describes_keys_for_help() {
        assert_eq!(KeyBindings::describe(KeyBindings::default().next_keys()), "→/l");
    }
}
