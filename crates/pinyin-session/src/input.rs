use tracing::debug;

use pinyin_core::unicode::{chinese_punctuation, is_spelling_char};

use super::types::{ImeState, KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    pub(super) fn handle_input(&mut self, event: KeyEvent) -> KeyResponse {
        if let Some(local) = event.selection_digit() {
            return self.select_in_page(local);
        }

        match event {
            KeyEvent::Char { ch: '\'', alt: true } => KeyResponse::consumed(),
            KeyEvent::Char { ch, alt: true } => {
                let mut resp = KeyResponse::consumed();
                let sentence = self.pending_sentence();
                self.commit_text(&mut resp, &sentence);
                self.commit_fullwidth(&mut resp, ch);
                self.reset_to_idle();
                resp.with_display_from(self.render())
            }
            KeyEvent::Char { ch, .. } if self.is_surface_char(ch) => {
                self.guarded_surface_change(Some(ch))
            }
            KeyEvent::Delete => self.guarded_surface_change(None),
            KeyEvent::Char { ch, .. } => match chinese_punctuation(ch) {
                Some(punct) => {
                    let mut resp = KeyResponse::consumed();
                    let sentence = self.pending_sentence();
                    self.commit_text(&mut resp, &sentence);
                    self.commit_text(&mut resp, punct);
                    self.reset_to_idle();
                    resp.with_display_from(self.render())
                }
                None => KeyResponse::consumed(),
            },
            KeyEvent::ArrowLeft => self.navigate(Self::active_backward),
            KeyEvent::ArrowRight => self.navigate(Self::active_forward),
            KeyEvent::ArrowUp => {
                if self.page_backward(false) {
                    return KeyResponse::consumed().with_display_from(self.render());
                }
                // Already on the first page: edit the composing string instead.
                self.transition(ImeState::Composing);
                KeyResponse::consumed().with_display_from(self.render())
            }
            KeyEvent::ArrowDown => self.navigate(|s| s.page_forward(false)),
            KeyEvent::Enter => {
                let mut resp = KeyResponse::consumed();
                if self.modes.enter_key_normal() {
                    let spelling = self.raw_spelling();
                    self.commit_text(&mut resp, &spelling);
                } else {
                    let sentence = self.pending_sentence();
                    self.commit_text(&mut resp, &sentence);
                    self.commit_text(&mut resp, "\n");
                }
                self.reset_to_idle();
                resp.with_display_from(self.render())
            }
            KeyEvent::Space { .. } | KeyEvent::Center => self.choose_highlighted(),
            KeyEvent::Back => self.dismiss(),
        }
    }

    /// Letters always edit the spelling; an apostrophe only when the
    /// character before the cursor is not one already.
    pub(super) fn is_surface_char(&self, ch: char) -> bool {
        is_spelling_char(ch) && !(ch == '\'' && self.decoding.char_before_cursor_is_separator())
    }

    /// Surface change that ignores everything but delete once the buffer
    /// is full.
    pub(super) fn guarded_surface_change(&mut self, ch: Option<char>) -> KeyResponse {
        if ch.is_some() && self.decoding.is_full() {
            debug!(
                capacity = self.decoding.spelling().capacity(),
                "spelling buffer full"
            );
            return KeyResponse::consumed();
        }
        self.surface_change(ch)
    }
}
