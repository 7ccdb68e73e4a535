use tracing::{debug, debug_span};

use pinyin_core::ImeError;

use super::types::{ImeState, KeyResponse};
use super::InputSession;

impl InputSession {
    /// Choose `index` (or re-search when `None`) and move the state machine
    /// to wherever the new composition leads.
    pub(super) fn choose_and_update(&mut self, index: Option<usize>) -> KeyResponse {
        let mut resp = KeyResponse::consumed();

        if !self.modes.is_chinese_text() {
            if let Some(text) = index.and_then(|i| self.decoding.candidate(i)) {
                let text = text.to_string();
                self.commit_text(&mut resp, &text);
            }
            self.reset_to_idle();
            return resp.with_display_from(self.render());
        }

        let result = match index {
            Some(i) if self.state == ImeState::Predict => {
                self.decoding.choose_prediction(i).map(|()| 1)
            }
            Some(i) => self.decoding.choose(i),
            None => self.decoding.search(self.state != ImeState::Composing),
        };
        let chosen = match result {
            Ok(total) => {
                debug!(total, ?index, "decoded");
                index.is_some()
            }
            Err(e @ ImeError::InvalidSelectionIndex { .. }) => {
                debug!(error = %e, "selection ignored");
                return resp;
            }
            Err(ImeError::EngineUnavailable) => {
                self.reset_to_idle();
                return resp.with_display_from(self.render());
            }
            // Already degraded by the decoding session.
            Err(_) => false,
        };

        if self.decoding.composition().composing.is_empty() {
            self.reset_to_idle();
        } else if chosen && self.decoding.can_do_prediction() {
            let text = self.decoding.composition().active_part();
            self.commit_text(&mut resp, &text);
            self.enter_predict();
        } else {
            if self.state == ImeState::Idle {
                if self.decoding.composition().decoded_len == 0 {
                    self.transition(ImeState::Composing);
                } else {
                    self.transition(ImeState::Input);
                }
            } else if self.decoding.composition().selection_finished {
                self.transition(ImeState::Composing);
            }
            self.page = 0;
            self.active = 0;
        }
        resp.with_display_from(self.render())
    }

    /// Show predictions for the committed context, or go Idle when there
    /// are none.
    fn enter_predict(&mut self) {
        self.transition(ImeState::Predict);
        self.page = 0;
        self.active = 0;
        let found = if self.prefs.prediction {
            let context = self.prediction_context();
            self.decoding.predict(&context).unwrap_or(0)
        } else {
            self.decoding.reset_candidates();
            0
        };
        if found == 0 {
            self.reset_to_idle();
        }
    }

    /// Append `ch` (or delete before the cursor when `None`) and re-search.
    pub(super) fn surface_change(&mut self, ch: Option<char>) -> KeyResponse {
        match ch {
            Some(ch) => {
                if let Err(e) = self.decoding.append_char(ch, false) {
                    debug!(error = %e, ?ch, "key ignored");
                    return KeyResponse::consumed();
                }
            }
            None => self.decoding.prepare_delete_before_cursor(),
        }
        self.choose_and_update(None)
    }

    /// Choose candidate `local` of the visible page. Out-of-page indices are
    /// ignored without touching the state.
    pub(super) fn select_in_page(&mut self, local: usize) -> KeyResponse {
        let cache = self.decoding.cache();
        let len = cache.page_len(self.page);
        if local >= len {
            debug!(local, len, page = self.page, "selection outside page");
            return KeyResponse::consumed();
        }
        let index = cache.page_start(self.page) + local;
        self.choose_and_update(Some(index))
    }

    /// Choose the highlighted candidate, if the page has one.
    pub(super) fn choose_highlighted(&mut self) -> KeyResponse {
        match self.highlighted() {
            Some(index) => self.choose_and_update(Some(index)),
            None => KeyResponse::consumed(),
        }
    }

    /// A candidate in the visible page was touched.
    pub fn select_candidate(&mut self, local: usize) -> KeyResponse {
        let _span = debug_span!("select_candidate", local).entered();
        match self.state {
            ImeState::Composing => {
                self.transition(ImeState::Input);
                KeyResponse::consumed().with_display_from(self.render())
            }
            ImeState::Input | ImeState::Predict => self.select_in_page(local),
            ImeState::AppCompletion => {
                let mut resp = KeyResponse::consumed();
                let cache = self.decoding.cache();
                if local < cache.page_len(self.page) {
                    let index = cache.page_start(self.page) + local;
                    if let Some(text) = self.decoding.candidate(index) {
                        let text = text.to_string();
                        self.commit_text(&mut resp, &text);
                    }
                }
                self.reset_to_idle();
                resp.with_display_from(self.render())
            }
            ImeState::Idle | ImeState::Bypass => KeyResponse::not_consumed(),
        }
    }

    /// Completions offered by the host application for the focused field.
    pub fn display_completions(&mut self, completions: Vec<String>) -> KeyResponse {
        let accepted = !self.modes.is_chinese_text()
            || matches!(self.state, ImeState::Idle | ImeState::Predict);
        if !accepted || completions.is_empty() {
            debug!(state = ?self.state, count = completions.len(), "completions ignored");
            return KeyResponse::not_consumed();
        }
        self.transition(ImeState::AppCompletion);
        self.decoding.prepare_app_completions(completions);
        self.page = 0;
        self.active = 0;
        KeyResponse::consumed().with_display_from(self.render())
    }

    // --- candidate view navigation ---

    /// Next page. `from_arrow` puts the highlight on its first item,
    /// otherwise the highlight keeps its position.
    pub(super) fn page_forward(&mut self, from_arrow: bool) -> bool {
        let Some(page) = self.decoding.get_page(self.page + 1) else {
            return false;
        };
        if page.is_empty() {
            return false;
        }
        self.page += 1;
        self.active = if from_arrow {
            0
        } else {
            self.active.min(page.len() - 1)
        };
        true
    }

    /// Previous page. `from_arrow` puts the highlight on its last item.
    pub(super) fn page_backward(&mut self, from_arrow: bool) -> bool {
        if !self.decoding.cache().page_backwardable(self.page) {
            return false;
        }
        self.page -= 1;
        let len = self.decoding.cache().page_len(self.page);
        self.active = if from_arrow {
            len.saturating_sub(1)
        } else {
            self.active.min(len.saturating_sub(1))
        };
        true
    }

    pub(super) fn active_forward(&mut self) -> bool {
        if self.active + 1 < self.decoding.cache().page_len(self.page) {
            self.active += 1;
            return true;
        }
        self.page_forward(true)
    }

    pub(super) fn active_backward(&mut self) -> bool {
        if self.active > 0 {
            self.active -= 1;
            return true;
        }
        self.page_backward(true)
    }
}
