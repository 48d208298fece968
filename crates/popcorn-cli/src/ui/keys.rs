use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything the browse view can do. Bindings map a named key to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CloseOrQuit,
    FocusSearch,
    CycleFocus,
    MoveUp,
    MoveDown,
    OpenSelected,
    RemoveWatched,
    CommitRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySpec {
    Code(KeyCode),
    Ctrl(char),
    Char(char),
}

impl KeySpec {
    fn matches(&self, event: &KeyEvent) -> bool {
        match self {
            KeySpec::Code(code) => event.code == *code,
            KeySpec::Ctrl(c) => {
                event.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(event.code, KeyCode::Char(ec) if ec.to_ascii_lowercase() == *c)
            }
            KeySpec::Char(c) => {
                !event.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(event.code, KeyCode::Char(ec) if ec.to_ascii_lowercase() == *c)
            }
        }
    }
}

/// Key table for one scope of the view. Key names are case-insensitive
/// symbolic names ("escape", "enter", "tab", "up", "space", "ctrl-c", or a
/// single character); unknown names are ignored.
#[derive(Default)]
pub struct KeyBindings {
    bindings: Vec<(KeySpec, Action)>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key_name: &str, action: Action) {
        if let Some(spec) = parse_key_name(key_name) {
            self.bindings.push((spec, action));
        }
    }

    pub fn lookup(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(spec, _)| spec.matches(event))
            .map(|(_, action)| *action)
    }
}

fn parse_key_name(name: &str) -> Option<KeySpec> {
    let lower = name.to_lowercase();

    if let Some(rest) = lower.strip_prefix("ctrl-") {
        let mut chars = rest.chars();
        let c = chars.next()?;
        if chars.next().is_none() {
            return Some(KeySpec::Ctrl(c));
        }
        return None;
    }

    match lower.as_str() {
        "escape" | "esc" => Some(KeySpec::Code(KeyCode::Esc)),
        "enter" => Some(KeySpec::Code(KeyCode::Enter)),
        "tab" => Some(KeySpec::Code(KeyCode::Tab)),
        "backspace" => Some(KeySpec::Code(KeyCode::Backspace)),
        "up" => Some(KeySpec::Code(KeyCode::Up)),
        "down" => Some(KeySpec::Code(KeyCode::Down)),
        "left" => Some(KeySpec::Code(KeyCode::Left)),
        "right" => Some(KeySpec::Code(KeyCode::Right)),
        "delete" => Some(KeySpec::Code(KeyCode::Delete)),
        "space" => Some(KeySpec::Char(' ')),
        _ => {
            let mut chars = lower.chars();
            let c = chars.next()?;
            if chars.next().is_none() {
                Some(KeySpec::Char(c))
            } else {
                None
            }
        }
    }
}
