use tracing::debug;

use super::types::{ComposingStatus, ImeState, KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    pub(super) fn handle_composing(&mut self, event: KeyEvent) -> KeyResponse {
        match event {
            KeyEvent::Char { ch: '\'', alt: true } => KeyResponse::consumed(),
            KeyEvent::Char { ch, alt: true } => {
                let mut resp = KeyResponse::consumed();
                let text = if self.composing_status == ComposingStatus::ShowStringLowercase {
                    self.raw_spelling()
                } else {
                    self.composing_string()
                };
                self.commit_text(&mut resp, &text);
                self.commit_fullwidth(&mut resp, ch);
                self.reset_to_idle();
                resp.with_display_from(self.render())
            }
            KeyEvent::ArrowDown => {
                if !self.decoding.composition().selection_finished {
                    self.transition(ImeState::Input);
                }
                KeyResponse::consumed().with_display_from(self.render())
            }
            KeyEvent::ArrowLeft => self.move_composing_cursor(-1),
            KeyEvent::ArrowRight => self.move_composing_cursor(1),
            KeyEvent::Enter if !self.modes.enter_key_normal() => {
                let mut resp = KeyResponse::consumed();
                let sentence = self.pending_sentence();
                self.commit_text(&mut resp, &sentence);
                self.commit_text(&mut resp, "\n");
                self.reset_to_idle();
                resp.with_display_from(self.render())
            }
            KeyEvent::Enter | KeyEvent::Center | KeyEvent::Space { .. } => self.confirm_composing(),
            KeyEvent::Back => self.dismiss(),
            KeyEvent::Delete => self.guarded_surface_change(None),
            KeyEvent::Char { ch, .. } if self.is_surface_char(ch) || ch.is_ascii_digit() => {
                self.guarded_surface_change(Some(ch))
            }
            KeyEvent::Char { .. } | KeyEvent::ArrowUp => KeyResponse::consumed(),
        }
    }

    /// Commit what the composing view shows and go Idle. Raw spelling and
    /// edited text may be a raw-unicode escape.
    fn confirm_composing(&mut self) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        match self.composing_status {
            ComposingStatus::ShowStringLowercase => {
                let spelling = self.raw_spelling();
                self.commit_raw_unicode_or_text(&mut resp, &spelling);
            }
            ComposingStatus::EditPinyin => {
                let composing = self.composing_string();
                self.commit_raw_unicode_or_text(&mut resp, &composing);
            }
            ComposingStatus::ShowPinyin => {
                let composing = self.composing_string();
                self.commit_text(&mut resp, &composing);
            }
        }
        self.reset_to_idle();
        resp.with_display_from(self.render())
    }

    /// Arrow keys in the composing view. The first press on the raw
    /// spelling only switches to the editable layout.
    fn move_composing_cursor(&mut self, offset: isize) -> KeyResponse {
        match self.composing_status {
            ComposingStatus::EditPinyin => self.decoding.move_cursor(offset),
            ComposingStatus::ShowStringLowercase | ComposingStatus::ShowPinyin => {
                debug!("composing view switched to editing");
                self.composing_status = ComposingStatus::EditPinyin;
            }
        }
        KeyResponse::consumed().with_display_from(self.render())
    }
}
