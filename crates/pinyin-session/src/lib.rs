//! Pinyin input session: the key-driven state machine on top of a
//! [`DecodingSession`].
//!
//! `InputSession` owns the decoding state and the mode switcher, processes
//! each key, and returns a [`KeyResponse`] that the host replays onto its
//! text surface and candidate view (see [`ImeHost`]).

pub(crate) mod types;

mod commit;
mod composing;
mod idle;
mod input;
mod key_handlers;
mod predict;
mod response;
mod selection;
mod soft_keys;

#[cfg(test)]
mod tests;

use tracing::debug;

use pinyin_core::decoder::DecodingEngine;
use pinyin_core::decoding::DecodingSession;
use pinyin_core::mode::{FieldHints, ModeIcon, ModeSwitcher};
use pinyin_core::settings::{Preferences, Settings};

pub use response::ImeHost;
pub use types::{
    CandidateAction, ComposingStatus, ImeState, KeyEvent, KeyResponse, MarkedText, SideEffects,
};

/// Stateful IME session encapsulating all input processing logic.
pub struct InputSession {
    decoding: DecodingSession,
    modes: ModeSwitcher,

    state: ImeState,
    composing_status: ComposingStatus,

    // Candidate view position
    page: usize,
    active: usize,

    // Settings
    prefs: Preferences,
    context_chars: usize,

    // Trailing Chinese text committed into the focused field, the context
    // for predictions
    committed_context: String,
}

impl InputSession {
    pub fn new(engine: Box<dyn DecodingEngine>, settings: &Settings) -> Self {
        Self {
            decoding: DecodingSession::new(engine, settings),
            modes: ModeSwitcher::new(settings),
            state: ImeState::Idle,
            composing_status: ComposingStatus::ShowPinyin,
            page: 0,
            active: 0,
            prefs: settings.preferences(),
            context_chars: settings.prediction.context_chars,
            committed_context: String::new(),
        }
    }

    pub fn state(&self) -> ImeState {
        self.state
    }

    pub fn composing_status(&self) -> ComposingStatus {
        self.composing_status
    }

    pub fn decoding(&self) -> &DecodingSession {
        &self.decoding
    }

    pub fn modes(&self) -> &ModeSwitcher {
        &self.modes
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn set_preferences(&mut self, prefs: Preferences) {
        self.prefs = prefs;
    }

    /// Current candidate page and highlighted page-local position.
    pub fn candidate_position(&self) -> (usize, usize) {
        (self.page, self.active)
    }

    /// The last `context_chars` characters committed in Chinese mode since
    /// the current field gained focus.
    pub fn committed_context(&self) -> &str {
        &self.committed_context
    }

    /// A text field gained focus.
    pub fn start_input(&mut self, hints: FieldHints, with_soft_keyboard: bool) -> KeyResponse {
        let icon = if with_soft_keyboard {
            self.modes.request_for_field(hints)
        } else {
            self.modes.request_for_field_hkb(hints)
        };
        debug!(?hints, with_soft_keyboard, mode = ?self.modes.mode(), "start input");
        if self.state == ImeState::Bypass {
            self.transition(ImeState::Idle);
        }
        self.reset_to_idle();
        self.committed_context.clear();
        let mut resp = KeyResponse::consumed().with_display_from(self.render());
        resp.icon = Some(icon);
        resp
    }

    /// The text field lost focus after a normal finish.
    pub fn finish_input(&mut self) -> KeyResponse {
        self.reset_to_idle();
        self.committed_context.clear();
        KeyResponse::consumed().with_display_from(self.render())
    }

    /// Focus moved somewhere the IME must not touch.
    pub fn enter_bypass(&mut self) {
        self.reset_to_idle();
        self.committed_context.clear();
        self.transition(ImeState::Bypass);
    }

    pub fn icon(&self) -> ModeIcon {
        self.modes.icon()
    }

    /// Move to `next`, logging real changes.
    pub(crate) fn transition(&mut self, next: ImeState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
    }

    /// Drop the composition and candidates and go Idle. Safe to repeat.
    pub(crate) fn reset_to_idle(&mut self) {
        if self.state == ImeState::Bypass {
            return;
        }
        self.transition(ImeState::Idle);
        self.decoding.reset();
        self.composing_status = ComposingStatus::ShowPinyin;
        self.page = 0;
        self.active = 0;
    }
}
