use tracing::{debug, debug_span};

use super::types::{ImeState, KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    /// Process a key event. Returns a KeyResponse describing what the caller should do.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ?event, state = ?self.state).entered();

        match event {
            // Focus is elsewhere; leave every key to the host.
            _ if self.state == ImeState::Bypass => KeyResponse::not_consumed(),

            // Shift+Space toggles the hardware keyboard language.
            KeyEvent::Space { shift: true } => {
                let icon = self.modes.switch_language_with_hkb();
                debug!(mode = ?self.modes.mode(), "language toggled");
                self.reset_to_idle();
                let mut resp = KeyResponse::consumed().with_display_from(self.render());
                resp.icon = Some(icon);
                resp
            }

            _ if self.modes.is_english_with_hkb() => KeyResponse::not_consumed(),

            _ if !self.modes.is_chinese_text() => self.handle_non_chinese(event),

            _ => match self.state {
                ImeState::Idle => self.handle_idle(event),
                // Completions are dropped by any key; the key itself is
                // handled as if nothing was shown.
                ImeState::AppCompletion => {
                    self.reset_to_idle();
                    self.handle_idle(event)
                }
                ImeState::Input => self.handle_input(event),
                ImeState::Predict => self.handle_predict(event),
                ImeState::Composing => self.handle_composing(event),
                ImeState::Bypass => KeyResponse::not_consumed(),
            },
        }
    }

    /// English, symbol, smiley and phone soft keyboards: characters commit
    /// as typed. Predictions or completions still on screen stay navigable.
    fn handle_non_chinese(&mut self, event: KeyEvent) -> KeyResponse {
        let showing = matches!(self.state, ImeState::Predict | ImeState::AppCompletion);

        if showing {
            match event {
                KeyEvent::ArrowLeft => return self.navigate(Self::active_backward),
                KeyEvent::ArrowRight => return self.navigate(Self::active_forward),
                KeyEvent::ArrowUp => return self.navigate(|s| s.page_backward(false)),
                KeyEvent::ArrowDown => return self.navigate(|s| s.page_forward(false)),
                KeyEvent::Center => return self.choose_highlighted(),
                KeyEvent::Back => return self.dismiss(),
                _ => self.reset_to_idle(),
            }
        }

        let mut resp = KeyResponse::consumed();
        match event {
            KeyEvent::Char { ch, alt: true } => self.commit_fullwidth(&mut resp, ch),
            KeyEvent::Char { ch, alt: false } if !ch.is_control() => {
                let ch = if self.modes.is_english_upper_with_skb() {
                    ch.to_ascii_uppercase()
                } else {
                    ch
                };
                self.commit_text(&mut resp, ch.encode_utf8(&mut [0; 4]));
            }
            KeyEvent::Enter => self.commit_text(&mut resp, "\n"),
            KeyEvent::Space { .. } => self.commit_text(&mut resp, " "),
            _ => return KeyResponse::not_consumed(),
        }
        resp.with_display_from(self.render())
    }

    /// Run a candidate view move and redraw. Consumed even at the edges.
    pub(super) fn navigate(&mut self, step: impl FnOnce(&mut Self) -> bool) -> KeyResponse {
        if !step(self) {
            debug!(page = self.page, active = self.active, "no further candidates");
        }
        KeyResponse::consumed().with_display_from(self.render())
    }

    /// Back: drop everything and ask the host to hide the keyboard.
    pub(super) fn dismiss(&mut self) -> KeyResponse {
        self.reset_to_idle();
        let mut resp = KeyResponse::consumed().with_display_from(self.render());
        resp.side_effects.request_hide = true;
        resp
    }
}
