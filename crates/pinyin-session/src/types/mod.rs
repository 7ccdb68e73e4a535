mod state;
pub use state::*;

use pinyin_core::decoding::CandidatePage;
use pinyin_core::mode::{ModeIcon, SystemKey};

/// A key press as delivered by the host, hardware or soft keyboard alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A printable character. `alt` marks the ALT modifier.
    Char { ch: char, alt: bool },
    /// Space bar; `shift` marks the SHIFT modifier.
    Space { shift: bool },
    /// Enter or return.
    Enter,
    /// D-pad center.
    Center,
    /// Backspace.
    Delete,
    /// System back key.
    Back,
    /// D-pad up.
    ArrowUp,
    /// D-pad down.
    ArrowDown,
    /// D-pad left.
    ArrowLeft,
    /// D-pad right.
    ArrowRight,
}

impl KeyEvent {
    pub fn ch(ch: char) -> Self {
        KeyEvent::Char { ch, alt: false }
    }

    pub fn alt(ch: char) -> Self {
        KeyEvent::Char { ch, alt: true }
    }

    pub fn space() -> Self {
        KeyEvent::Space { shift: false }
    }

    /// The event a soft key with a system key code stands for.
    pub fn from_system(key: SystemKey) -> Self {
        match key {
            SystemKey::Enter => KeyEvent::Enter,
            SystemKey::Delete => KeyEvent::Delete,
            SystemKey::Space => KeyEvent::space(),
            SystemKey::Center => KeyEvent::Center,
            SystemKey::Back => KeyEvent::Back,
            SystemKey::Up => KeyEvent::ArrowUp,
            SystemKey::Down => KeyEvent::ArrowDown,
            SystemKey::Left => KeyEvent::ArrowLeft,
            SystemKey::Right => KeyEvent::ArrowRight,
        }
    }

    /// Digit `1`..=`9` as a page-local candidate index.
    pub(crate) fn selection_digit(self) -> Option<usize> {
        match self {
            KeyEvent::Char {
                ch: ch @ '1'..='9',
                alt: false,
            } => Some(ch as usize - '1' as usize),
            _ => None,
        }
    }
}

/// Marked (composing) text. An empty `text` hides the composing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedText {
    pub text: String,
    /// Leading characters drawn as the active (decoded) part.
    pub active_len: usize,
    pub cursor: usize,
}

impl MarkedText {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            active_len: 0,
            cursor: 0,
        }
    }
}

/// Candidate view action, exactly one of three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAction {
    /// Leave the view as it is.
    Keep,
    /// Show `page` with the candidate at `active` highlighted.
    Show {
        page: CandidatePage,
        active: usize,
        can_forward: bool,
        can_backward: bool,
    },
    Hide,
}

/// Orthogonal side effects that accompany a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideEffects {
    /// Ask the host to dismiss the keyboard window.
    pub request_hide: bool,
}

/// Response from `handle_key` and friends. Nothing here is an error: the
/// worst a key can do is leave the view unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    pub consumed: bool,
    pub commit: Option<String>,
    pub marked: Option<MarkedText>,
    pub candidates: CandidateAction,
    pub icon: Option<ModeIcon>,
    pub side_effects: SideEffects,
}

impl KeyResponse {
    pub(crate) fn not_consumed() -> Self {
        Self {
            consumed: false,
            commit: None,
            marked: None,
            candidates: CandidateAction::Keep,
            icon: None,
            side_effects: SideEffects::default(),
        }
    }

    pub(crate) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    /// Keep commit, icon and side effects from `self`; take the view from `other`.
    pub(crate) fn with_display_from(mut self, other: KeyResponse) -> KeyResponse {
        self.marked = other.marked;
        self.candidates = other.candidates;
        self
    }

    pub(crate) fn push_commit(&mut self, text: &str) {
        self.commit.get_or_insert_with(String::new).push_str(text);
    }
}
