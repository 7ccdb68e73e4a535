use pinyin_core::decoding::CandidatePage;
use pinyin_core::mode::ModeIcon;

use super::types::{CandidateAction, ComposingStatus, ImeState, KeyResponse, MarkedText};
use super::InputSession;

/// The host side of the IME: text surface, composing view, candidate view
/// and keyboard window.
pub trait ImeHost {
    fn commit_text(&mut self, text: &str);
    fn show_composing(&mut self, marked: &MarkedText);
    fn hide_composing(&mut self);
    fn show_candidates(&mut self, page: &CandidatePage, active: usize);
    fn hide_candidates(&mut self);
    fn update_navigation_arrows(&mut self, can_forward: bool, can_backward: bool);
    fn set_mode_icon(&mut self, icon: ModeIcon);
    fn request_hide(&mut self);
}

impl KeyResponse {
    /// Replay this response onto `host`, commit first.
    pub fn apply(&self, host: &mut dyn ImeHost) {
        if let Some(text) = &self.commit {
            host.commit_text(text);
        }
        match &self.marked {
            Some(marked) if marked.text.is_empty() => host.hide_composing(),
            Some(marked) => host.show_composing(marked),
            None => {}
        }
        match &self.candidates {
            CandidateAction::Keep => {}
            CandidateAction::Show {
                page,
                active,
                can_forward,
                can_backward,
            } => {
                host.show_candidates(page, *active);
                host.update_navigation_arrows(*can_forward, *can_backward);
            }
            CandidateAction::Hide => host.hide_candidates(),
        }
        if let Some(icon) = self.icon {
            host.set_mode_icon(icon);
        }
        if self.side_effects.request_hide {
            host.request_hide();
        }
    }
}

impl InputSession {
    /// The composing view and candidate view for the current state.
    pub(super) fn render(&mut self) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        match self.state {
            ImeState::Bypass => return resp,
            ImeState::Idle => {
                resp.marked = Some(MarkedText::empty());
                resp.candidates = CandidateAction::Hide;
                return resp;
            }
            ImeState::Input | ImeState::Composing => {
                self.sync_composing_status();
                resp.marked = Some(self.marked_text());
            }
            ImeState::Predict | ImeState::AppCompletion => {
                resp.marked = Some(MarkedText::empty());
            }
        }
        resp.candidates = self.candidate_action();
        resp
    }

    fn candidate_action(&mut self) -> CandidateAction {
        match self.decoding.get_page(self.page) {
            Some(page) if !page.is_empty() => {
                self.active = self.active.min(page.len() - 1);
                CandidateAction::Show {
                    page,
                    active: self.active,
                    can_forward: self.decoding.cache().page_forwardable(self.page),
                    can_backward: self.decoding.cache().page_backwardable(self.page),
                }
            }
            _ => CandidateAction::Hide,
        }
    }

    /// Pick the composing view layout for the current state.
    fn sync_composing_status(&mut self) {
        if self.state == ImeState::Input {
            self.composing_status = ComposingStatus::ShowPinyin;
            self.decoding.move_cursor_to_edge(false);
        } else if self.decoding.composition().fixed_len != 0
            || self.composing_status == ComposingStatus::EditPinyin
        {
            self.composing_status = ComposingStatus::EditPinyin;
        } else {
            self.composing_status = ComposingStatus::ShowStringLowercase;
        }
    }

    pub(super) fn marked_text(&self) -> MarkedText {
        let comp = self.decoding.composition();
        match self.composing_status {
            ComposingStatus::ShowPinyin => MarkedText {
                text: comp.display.clone(),
                active_len: comp.active_display_len,
                cursor: self.decoding.cursor_in_display(),
            },
            ComposingStatus::EditPinyin => MarkedText {
                text: comp.composing.clone(),
                active_len: comp.active_len,
                cursor: self.decoding.cursor_in_composing(),
            },
            ComposingStatus::ShowStringLowercase => {
                let spelling = self.decoding.spelling();
                MarkedText {
                    text: spelling.as_str().to_string(),
                    active_len: spelling.len(),
                    cursor: spelling.cursor(),
                }
            }
        }
    }
}
