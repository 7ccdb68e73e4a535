use super::{ModeTrigger, ToggleStateId, ToggleStates};

/// Editing keys a soft key can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKey {
    Enter,
    Delete,
    Space,
    Center,
    Back,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCode {
    /// Commit or append the face label.
    Text,
    System(SystemKey),
    Mode(ModeTrigger),
}

/// What a soft key shows and does in one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFace {
    pub label: Option<String>,
    pub code: KeyCode,
}

impl KeyFace {
    pub fn text(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            code: KeyCode::Text,
        }
    }

    pub fn system(key: SystemKey) -> Self {
        Self {
            label: None,
            code: KeyCode::System(key),
        }
    }

    pub fn mode(trigger: ModeTrigger, label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            code: KeyCode::Mode(trigger),
        }
    }
}

/// A soft keyboard key: either a fixed face, or a base face with
/// alternates selected by the active toggle states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftKey {
    Static(KeyFace),
    Toggled {
        base: KeyFace,
        states: Vec<(ToggleStateId, KeyFace)>,
    },
}

impl SoftKey {
    /// Resolve the face for the given toggle states. Toggle states are
    /// checked in the order the mode switcher enabled them; the first one
    /// this key defines wins.
    pub fn face<'a>(&'a self, toggles: &ToggleStates) -> &'a KeyFace {
        match self {
            SoftKey::Static(face) => face,
            SoftKey::Toggled { base, states } => toggles
                .key_states
                .iter()
                .find_map(|active| {
                    states
                        .iter()
                        .find(|(id, _)| id == active)
                        .map(|(_, face)| face)
                })
                .unwrap_or(base),
        }
    }
}
