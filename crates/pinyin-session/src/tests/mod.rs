mod basic;
mod proptest_fsm;
mod scenarios;

use pinyin_core::decoder::{MemoryDecoder, MemoryLexicon, MemoryProbe};
use pinyin_core::mode::FieldHints;
use pinyin_core::settings::Settings;

use super::types::KeyEvent;
use super::{InputSession, KeyResponse};

/// Session over the default lexicon, started on a plain text field with
/// the soft keyboard.
pub(super) fn make_session() -> (InputSession, MemoryProbe) {
    make_session_with(&Settings::default())
}

pub(super) fn make_session_with(settings: &Settings) -> (InputSession, MemoryProbe) {
    let engine = MemoryDecoder::new(MemoryLexicon::default());
    let probe = engine.probe();
    let mut session = InputSession::new(Box::new(engine), settings);
    session.start_input(FieldHints::default(), true);
    (session, probe)
}

pub(super) fn press(session: &mut InputSession, event: KeyEvent) -> KeyResponse {
    session.handle_key(event)
}

// Helper: type a string one character at a time
pub(super) fn type_str(session: &mut InputSession, s: &str) -> Vec<KeyResponse> {
    s.chars()
        .map(|ch| session.handle_key(KeyEvent::ch(ch)))
        .collect()
}

/// Everything committed by `responses`, in order.
pub(super) fn committed(responses: &[KeyResponse]) -> String {
    responses.iter().filter_map(|r| r.commit.as_deref()).collect()
}
