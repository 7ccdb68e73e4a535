use tracing::{debug, debug_span};

use pinyin_core::mode::{KeyCode, SoftKey};

use super::types::{ImeState, KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    /// A soft keyboard key was released. `sticky` keyboards stay up after
    /// the key; others fall back to the previous mode.
    pub fn handle_soft_key(&mut self, key: &SoftKey, sticky: bool) -> KeyResponse {
        let face = key.face(self.modes.toggle_states()).clone();
        let _span = debug_span!("handle_soft_key", ?face, sticky).entered();

        if self.state == ImeState::Bypass {
            return KeyResponse::not_consumed();
        }

        let mut resp = match (&face.code, face.label.as_deref()) {
            (KeyCode::Mode(trigger), _) => {
                let icon = self.modes.switch_for_trigger(*trigger);
                self.reset_to_idle();
                let mut resp = KeyResponse::consumed().with_display_from(self.render());
                resp.icon = Some(icon);
                return resp;
            }
            (KeyCode::System(key), _) => self.handle_key(KeyEvent::from_system(*key)),
            (KeyCode::Text, Some(label)) => self.handle_label(label),
            (KeyCode::Text, None) => {
                debug!("text key without a label");
                KeyResponse::not_consumed()
            }
        };

        if !sticky {
            if let Some(icon) = self.modes.back_to_previous() {
                debug!(mode = ?self.modes.mode(), "back to previous keyboard");
                self.reset_to_idle();
                resp = resp.with_display_from(self.render());
                resp.icon = Some(icon);
            }
        }
        resp
    }

    fn handle_label(&mut self, label: &str) -> KeyResponse {
        let mut chars = label.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        };

        // Letter keys type into the spelling like their hardware twins.
        if let Some(ch) = single.filter(|ch| ch.is_ascii_alphanumeric()) {
            return self.handle_key(KeyEvent::ch(ch));
        }

        let composing = matches!(self.state, ImeState::Input | ImeState::Composing);
        if single == Some('\'')
            && composing
            && self.modes.is_chinese_text_with_skb()
            && !self.decoding.spelling().is_empty()
        {
            if !self.is_surface_char('\'') {
                return KeyResponse::consumed();
            }
            return self.guarded_surface_change(Some('\''));
        }

        let mut resp = KeyResponse::consumed();
        let pending = match self.state {
            ImeState::Input => self.pending_sentence(),
            ImeState::Composing => self.composing_string(),
            _ => String::new(),
        };
        self.commit_text(&mut resp, &pending);
        self.commit_text(&mut resp, label);
        self.reset_to_idle();
        resp.with_display_from(self.render())
    }
}
