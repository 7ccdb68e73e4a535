use tracing::debug;

use pinyin_core::unicode::chinese_punctuation;

use super::types::{KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    pub(super) fn handle_idle(&mut self, event: KeyEvent) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        match event {
            KeyEvent::Char { ch, alt: false } if ch.is_ascii_lowercase() => {
                return self.start_spelling(ch);
            }
            KeyEvent::Char { ch, alt: true } => self.commit_fullwidth(&mut resp, ch),
            KeyEvent::Char { ch, alt: false } => match chinese_punctuation(ch) {
                Some(punct) => self.commit_text(&mut resp, punct),
                None if ch.is_control() => return KeyResponse::not_consumed(),
                None => self.commit_text(&mut resp, ch.encode_utf8(&mut [0; 4])),
            },
            KeyEvent::Enter => self.commit_text(&mut resp, "\n"),
            KeyEvent::Space { .. } => self.commit_text(&mut resp, " "),
            _ => return KeyResponse::not_consumed(),
        }
        resp.with_display_from(self.render())
    }

    /// First letter of a new spelling: restart the engine and decode.
    pub(super) fn start_spelling(&mut self, ch: char) -> KeyResponse {
        if let Err(e) = self.decoding.append_char(ch, true) {
            debug!(error = %e, ?ch, "key ignored");
            return KeyResponse::consumed();
        }
        self.choose_and_update(None)
    }
}
