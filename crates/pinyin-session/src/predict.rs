use pinyin_core::unicode::chinese_punctuation;

use super::types::{ImeState, KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    pub(super) fn handle_predict(&mut self, event: KeyEvent) -> KeyResponse {
        if let Some(local) = event.selection_digit() {
            return self.select_in_page(local);
        }

        let mut resp = KeyResponse::consumed();
        match event {
            KeyEvent::Char { ch, alt: true } => {
                if let Some(text) = self.highlighted().and_then(|i| self.decoding.candidate(i)) {
                    let text = text.to_string();
                    self.commit_text(&mut resp, &text);
                }
                self.commit_fullwidth(&mut resp, ch);
            }
            KeyEvent::Char { ch, alt: false } if ch.is_ascii_lowercase() => {
                self.reset_to_idle();
                self.transition(ImeState::Input);
                return self.start_spelling(ch);
            }
            KeyEvent::Char { ch, alt: false } => match chinese_punctuation(ch) {
                Some(punct) => self.commit_text(&mut resp, punct),
                None if ch.is_control() => {}
                None => self.commit_text(&mut resp, ch.encode_utf8(&mut [0; 4])),
            },
            KeyEvent::ArrowLeft => return self.navigate(Self::active_backward),
            KeyEvent::ArrowRight => return self.navigate(Self::active_forward),
            KeyEvent::ArrowUp => return self.navigate(|s| s.page_backward(false)),
            KeyEvent::ArrowDown => return self.navigate(|s| s.page_forward(false)),
            KeyEvent::Space { .. } | KeyEvent::Center => return self.choose_highlighted(),
            KeyEvent::Delete => {}
            KeyEvent::Back => return self.dismiss(),
            KeyEvent::Enter => self.commit_text(&mut resp, "\n"),
        }
        self.reset_to_idle();
        resp.with_display_from(self.render())
    }
}
