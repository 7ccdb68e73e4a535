use tracing::debug;

use pinyin_core::unicode::{decode_raw_unicode, fullwidth_for};

use super::types::KeyResponse;
use super::InputSession;

impl InputSession {
    /// Add `text` to the response's commit and, in Chinese text mode, to the
    /// prediction context. Empty text is dropped.
    pub(super) fn commit_text(&mut self, resp: &mut KeyResponse, text: &str) {
        if text.is_empty() {
            return;
        }
        debug!(text, "commit");
        resp.push_commit(text);
        if self.modes.is_chinese_text() {
            self.remember_committed(text);
        }
    }

    /// Keep only the trailing `context_chars` characters.
    fn remember_committed(&mut self, text: &str) {
        self.committed_context.push_str(text);
        let count = self.committed_context.chars().count();
        if count > self.context_chars {
            let skip = count - self.context_chars;
            if let Some((cut, _)) = self.committed_context.char_indices().nth(skip) {
                self.committed_context.replace_range(..cut, "");
            }
        }
    }

    /// Commit `token` as the codepoint it escapes, or literally when it is
    /// not a valid raw-unicode escape.
    pub(super) fn commit_raw_unicode_or_text(&mut self, resp: &mut KeyResponse, token: &str) {
        match decode_raw_unicode(token) {
            Ok(raw) => {
                debug!(token, codepoint = ?raw.codepoint, "raw unicode");
                self.commit_text(resp, &raw.text());
            }
            Err(e) => {
                debug!(error = %e, "not a raw unicode escape");
                self.commit_text(resp, token);
            }
        }
    }

    /// Commit the full-width form of an ALT-modified key, when it has one.
    pub(super) fn commit_fullwidth(&mut self, resp: &mut KeyResponse, ch: char) {
        match fullwidth_for(ch) {
            Some(wide) => self.commit_text(resp, wide.encode_utf8(&mut [0; 4])),
            None => debug!(?ch, "no full-width form"),
        }
    }

    /// Highlighted candidate as a cache index, when the page has it.
    pub(super) fn highlighted(&self) -> Option<usize> {
        let cache = self.decoding.cache();
        (self.active < cache.page_len(self.page)).then(|| cache.page_start(self.page) + self.active)
    }

    /// The sentence `Enter`, punctuation and ALT keys commit in Input: the
    /// fixed prefix plus the highlighted candidate, or the composing string
    /// when nothing is loaded.
    pub(super) fn pending_sentence(&self) -> String {
        self.highlighted()
            .and_then(|i| self.decoding.current_full_sentence(i))
            .unwrap_or_else(|| self.decoding.composition().composing.clone())
    }

    pub(super) fn raw_spelling(&self) -> String {
        self.decoding.spelling().as_str().to_string()
    }

    pub(super) fn composing_string(&self) -> String {
        self.decoding.composition().composing.clone()
    }

    pub(super) fn prediction_context(&self) -> String {
        self.committed_context.clone()
    }
}
