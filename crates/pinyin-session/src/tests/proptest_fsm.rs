//! Property-based tests for the InputSession state machine.
//!
//! Generates random key sequences via proptest and verifies that
//! structural invariants hold after every action.

use proptest::prelude::*;

use pinyin_core::mode::{KeyFace, ModeTrigger, SoftKey};
use pinyin_core::settings::Settings;

use super::make_session_with;
use crate::types::{CandidateAction, ImeState, KeyEvent, KeyResponse};
use crate::InputSession;

// ---------------------------------------------------------------------------
// Action enum: every user-facing operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Action {
    Letter(char),
    Apostrophe,
    Digit(char),
    Punctuation(char),
    Alt(char),
    Space,
    ShiftSpace,
    Enter,
    Center,
    Delete,
    Back,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    LanguageKey,
    Touch(usize),
    Completions,
}

// ---------------------------------------------------------------------------
// Strategy: weighted random Action generation
// ---------------------------------------------------------------------------

fn arb_letter() -> impl Strategy<Value = char> {
    // Letters from the default lexicon at higher weight so decoding succeeds.
    prop_oneof![
        4 => prop::sample::select(vec!['n', 'i', 'h', 'a', 'o', 'w', 's']),
        1 => prop::sample::select(vec![
            'b', 'c', 'd', 'e', 'f', 'g', 'j', 'k', 'l', 'm', 'p', 'q', 'r', 't', 'u', 'v',
            'x', 'y', 'z',
        ]),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        40 => arb_letter().prop_map(Action::Letter),
        3 => Just(Action::Apostrophe),
        5 => prop::sample::select(vec!['1', '2', '3', '4', '9']).prop_map(Action::Digit),
        3 => prop::sample::select(vec![',', '.', '?', '!']).prop_map(Action::Punctuation),
        2 => prop::sample::select(vec!['!', 'a', '1']).prop_map(Action::Alt),
        8 => Just(Action::Space),
        1 => Just(Action::ShiftSpace),
        5 => Just(Action::Enter),
        3 => Just(Action::Center),
        8 => Just(Action::Delete),
        2 => Just(Action::Back),
        3 => Just(Action::ArrowUp),
        3 => Just(Action::ArrowDown),
        3 => Just(Action::ArrowLeft),
        3 => Just(Action::ArrowRight),
        1 => Just(Action::LanguageKey),
        3 => (0usize..4).prop_map(Action::Touch),
        1 => Just(Action::Completions),
    ]
}

// ---------------------------------------------------------------------------
// Execute an Action against the session
// ---------------------------------------------------------------------------

fn execute_action(session: &mut InputSession, action: &Action) -> KeyResponse {
    match action {
        Action::Letter(ch) | Action::Digit(ch) | Action::Punctuation(ch) => {
            session.handle_key(KeyEvent::ch(*ch))
        }
        Action::Apostrophe => session.handle_key(KeyEvent::ch('\'')),
        Action::Alt(ch) => session.handle_key(KeyEvent::alt(*ch)),
        Action::Space => session.handle_key(KeyEvent::space()),
        Action::ShiftSpace => session.handle_key(KeyEvent::Space { shift: true }),
        Action::Enter => session.handle_key(KeyEvent::Enter),
        Action::Center => session.handle_key(KeyEvent::Center),
        Action::Delete => session.handle_key(KeyEvent::Delete),
        Action::Back => session.handle_key(KeyEvent::Back),
        Action::ArrowUp => session.handle_key(KeyEvent::ArrowUp),
        Action::ArrowDown => session.handle_key(KeyEvent::ArrowDown),
        Action::ArrowLeft => session.handle_key(KeyEvent::ArrowLeft),
        Action::ArrowRight => session.handle_key(KeyEvent::ArrowRight),
        Action::LanguageKey => {
            let key = SoftKey::Static(KeyFace::mode(ModeTrigger::Language, "中/英"));
            session.handle_soft_key(&key, true)
        }
        Action::Touch(local) => session.select_candidate(*local),
        Action::Completions => {
            session.display_completions(vec!["hello".to_string(), "world".to_string()])
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant checks: run after every action
// ---------------------------------------------------------------------------

fn assert_invariants(session: &InputSession, resp: &KeyResponse, action: &Action) {
    let decoding = session.decoding();
    let spelling = decoding.spelling();

    // 1. Cursor never leaves the spelling.
    assert!(
        spelling.cursor() <= spelling.len(),
        "cursor {} past spelling {:?} after {:?}",
        spelling.cursor(),
        spelling.as_str(),
        action,
    );

    // 2. Fixed prefix fits in the composing string.
    let composition = decoding.composition();
    assert!(
        composition.fixed_len <= composition.composing.chars().count(),
        "fixed_len {} exceeds composing {:?} after {:?}",
        composition.fixed_len,
        composition.composing,
        action,
    );

    // 3. Page table starts at zero and never goes backwards.
    let starts = decoding.cache().page_starts();
    assert_eq!(starts.first(), Some(&0), "page_starts {starts:?} after {action:?}");
    assert!(
        starts.windows(2).all(|w| w[0] <= w[1]),
        "page_starts {starts:?} not monotonic after {action:?}",
    );

    // 4. Idle holds no spelling.
    if session.state() == ImeState::Idle {
        assert!(
            spelling.is_empty(),
            "Idle session kept spelling {:?} after {:?}",
            spelling.as_str(),
            action,
        );
    }

    // 5. Shown pages are non-empty and the highlight is on the page.
    if let CandidateAction::Show { page, active, .. } = &resp.candidates {
        assert!(!page.is_empty(), "empty page shown after {action:?}");
        assert!(
            *active < page.len(),
            "active {} out of bounds for {} candidates after {:?}",
            active,
            page.len(),
            action,
        );
    }

    // 6. Committed text is non-empty when present.
    if let Some(text) = &resp.commit {
        assert!(!text.is_empty(), "empty commit after {action:?}");
    }

    // 7. Bypass never consumes.
    if session.state() == ImeState::Bypass {
        assert!(!resp.consumed, "Bypass consumed {action:?}");
    }
}

// ---------------------------------------------------------------------------
// proptest entry point
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn session_invariants_hold(actions in prop::collection::vec(arb_action(), 1..100)) {
        let (mut session, _) = make_session_with(&Settings::default());
        for action in &actions {
            let resp = execute_action(&mut session, action);
            assert_invariants(&session, &resp, action);
        }
    }

    #[test]
    fn session_invariants_with_small_pages_and_buffer(
        actions in prop::collection::vec(arb_action(), 1..100)
    ) {
        let mut settings = Settings::default();
        settings.candidates.page_size = 2;
        settings.candidates.fetch_chunk = 1;
        settings.spelling.max_len = 6;
        let (mut session, _) = make_session_with(&settings);
        for action in &actions {
            let resp = execute_action(&mut session, action);
            assert_invariants(&session, &resp, action);
        }
    }
}
