use pinyin_core::mode::{EnterAction, FieldHints, TextVariation};
use pinyin_core::settings::Settings;

use super::*;
use crate::types::{CandidateAction, ComposingStatus, ImeState, MarkedText};

fn shown(resp: &KeyResponse) -> Vec<String> {
    match &resp.candidates {
        CandidateAction::Show { page, .. } => page.candidates.clone(),
        other => panic!("expected candidates, got {other:?}"),
    }
}

fn small_pages() -> Settings {
    let mut settings = Settings::default();
    settings.candidates.page_size = 2;
    settings
}

// --- Idle ---

#[test]
fn letter_in_idle_starts_input() {
    let (mut session, _) = make_session();

    let resp = press(&mut session, KeyEvent::ch('n'));
    assert!(resp.consumed);
    assert_eq!(session.state(), ImeState::Input);
    assert_eq!(
        resp.marked,
        Some(MarkedText {
            text: "n".to_string(),
            active_len: 1,
            cursor: 1,
        })
    );
    assert_eq!(shown(&resp), ["你", "泥", "尼"]);
}

#[test]
fn idle_punctuation_commits_chinese_marks() {
    let (mut session, _) = make_session();

    assert_eq!(press(&mut session, KeyEvent::ch(',')).commit.as_deref(), Some("，"));
    assert_eq!(press(&mut session, KeyEvent::ch('.')).commit.as_deref(), Some("。"));
    assert_eq!(press(&mut session, KeyEvent::ch('!')).commit.as_deref(), Some("!"));
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn idle_alt_commits_fullwidth() {
    let (mut session, _) = make_session();

    let resp = press(&mut session, KeyEvent::alt('!'));
    assert_eq!(resp.commit.as_deref(), Some("！"));

    // Letters have no full-width form: consumed, nothing committed.
    let resp = press(&mut session, KeyEvent::alt('a'));
    assert!(resp.consumed);
    assert_eq!(resp.commit, None);
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn idle_enter_space_and_delete() {
    let (mut session, _) = make_session();

    assert_eq!(press(&mut session, KeyEvent::Enter).commit.as_deref(), Some("\n"));
    assert_eq!(press(&mut session, KeyEvent::space()).commit.as_deref(), Some(" "));
    assert!(!press(&mut session, KeyEvent::Delete).consumed);
    assert!(!press(&mut session, KeyEvent::ArrowLeft).consumed);
}

// --- Input ---

#[test]
fn space_chooses_highlighted_candidate() {
    let (mut session, _) = make_session();
    type_str(&mut session, "ni");

    let resp = press(&mut session, KeyEvent::space());
    assert_eq!(resp.commit.as_deref(), Some("你"));
    assert_eq!(session.state(), ImeState::Predict);
    assert_eq!(resp.marked, Some(MarkedText::empty()));
    assert_eq!(shown(&resp), ["好", "们"]);
}

#[test]
fn enter_commits_raw_spelling() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");

    let resp = press(&mut session, KeyEvent::Enter);
    assert_eq!(resp.commit.as_deref(), Some("nihao"));
    assert_eq!(session.state(), ImeState::Idle);
    assert_eq!(resp.candidates, CandidateAction::Hide);
    assert!(session.decoding().spelling().is_empty());
}

#[test]
fn enter_with_field_action_commits_sentence() {
    let (mut session, _) = make_session();
    session.start_input(
        FieldHints::default().with_enter_action(EnterAction::Go),
        true,
    );
    assert!(!session.modes().enter_key_normal());
    type_str(&mut session, "nihao");

    let resp = press(&mut session, KeyEvent::Enter);
    assert_eq!(resp.commit.as_deref(), Some("你好\n"));
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn comma_commits_sentence_then_punctuation() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");

    let resp = press(&mut session, KeyEvent::ch(','));
    assert_eq!(resp.commit.as_deref(), Some("你好，"));
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn alt_in_input_commits_sentence_and_fullwidth() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");

    let resp = press(&mut session, KeyEvent::alt('!'));
    assert_eq!(resp.commit.as_deref(), Some("你好！"));
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn display_spaces_decoded_syllables() {
    let (mut session, _) = make_session();
    let responses = type_str(&mut session, "nihao");

    let marked = responses.last().and_then(|r| r.marked.clone()).unwrap();
    assert_eq!(marked.text, "ni hao");
    assert_eq!(marked.active_len, 6);
    assert_eq!(shown(responses.last().unwrap())[0], "你好");
}

#[test]
fn apostrophe_is_never_doubled() {
    let (mut session, _) = make_session();
    type_str(&mut session, "xi'");
    assert_eq!(session.decoding().spelling().as_str(), "xi'");

    let resp = press(&mut session, KeyEvent::ch('\''));
    assert!(resp.consumed);
    assert_eq!(session.decoding().spelling().as_str(), "xi'");
}

#[test]
fn back_dismisses_composition() {
    let (mut session, _) = make_session();
    type_str(&mut session, "ni");

    let resp = press(&mut session, KeyEvent::Back);
    assert!(resp.side_effects.request_hide);
    assert_eq!(resp.commit, None);
    assert_eq!(session.state(), ImeState::Idle);
    assert!(session.decoding().spelling().is_empty());
}

#[test]
fn deleting_last_letter_returns_to_idle() {
    let (mut session, _) = make_session();
    type_str(&mut session, "n");

    let resp = press(&mut session, KeyEvent::Delete);
    assert!(resp.consumed);
    assert_eq!(session.state(), ImeState::Idle);
    assert_eq!(resp.marked, Some(MarkedText::empty()));
}

#[test]
fn arrows_move_highlight_across_pages() {
    let (mut session, _) = make_session_with(&small_pages());
    let responses = type_str(&mut session, "ni");
    assert_eq!(shown(responses.last().unwrap()), ["你", "泥"]);

    press(&mut session, KeyEvent::ArrowRight);
    assert_eq!(session.candidate_position(), (0, 1));

    let resp = press(&mut session, KeyEvent::ArrowRight);
    assert_eq!(session.candidate_position(), (1, 0));
    match &resp.candidates {
        CandidateAction::Show {
            page,
            active,
            can_forward,
            can_backward,
        } => {
            assert_eq!(page.number, 1);
            assert_eq!(page.candidates, ["尼"]);
            assert_eq!(*active, 0);
            assert!(!can_forward);
            assert!(can_backward);
        }
        other => panic!("expected candidates, got {other:?}"),
    }

    press(&mut session, KeyEvent::ArrowLeft);
    assert_eq!(session.candidate_position(), (0, 1));
}

#[test]
fn page_keys_keep_highlight_position() {
    let (mut session, _) = make_session_with(&small_pages());
    type_str(&mut session, "ni");

    press(&mut session, KeyEvent::ArrowRight);
    press(&mut session, KeyEvent::ArrowDown);
    // The second page has one candidate; the highlight is clamped to it.
    assert_eq!(session.candidate_position(), (1, 0));

    press(&mut session, KeyEvent::ArrowUp);
    assert_eq!(session.candidate_position(), (0, 0));
    assert_eq!(session.state(), ImeState::Input);

    // Past the last page nothing moves.
    press(&mut session, KeyEvent::ArrowDown);
    press(&mut session, KeyEvent::ArrowDown);
    assert_eq!(session.candidate_position(), (1, 0));
}

#[test]
fn digit_picks_from_current_page() {
    let (mut session, _) = make_session_with(&small_pages());
    type_str(&mut session, "ni");
    press(&mut session, KeyEvent::ArrowDown);

    let resp = press(&mut session, KeyEvent::ch('1'));
    assert_eq!(resp.commit.as_deref(), Some("尼"));
}

#[test]
fn full_buffer_ignores_letters_but_not_delete() {
    let mut settings = Settings::default();
    settings.spelling.max_len = 4;
    let (mut session, _) = make_session_with(&settings);
    type_str(&mut session, "nih");
    assert_eq!(session.decoding().spelling().as_str(), "nih");

    let resp = press(&mut session, KeyEvent::ch('a'));
    assert!(resp.consumed);
    assert_eq!(session.decoding().spelling().as_str(), "nih");

    press(&mut session, KeyEvent::Delete);
    assert_eq!(session.decoding().spelling().as_str(), "ni");
}

// --- Composing ---

#[test]
fn up_on_first_page_edits_raw_spelling() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");

    let resp = press(&mut session, KeyEvent::ArrowUp);
    assert_eq!(session.state(), ImeState::Composing);
    assert_eq!(
        session.composing_status(),
        ComposingStatus::ShowStringLowercase
    );
    assert_eq!(resp.marked.map(|m| m.text).as_deref(), Some("nihao"));

    let resp = press(&mut session, KeyEvent::space());
    assert_eq!(resp.commit.as_deref(), Some("nihao"));
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn down_leaves_composing_when_selection_open() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");
    press(&mut session, KeyEvent::ArrowUp);

    let resp = press(&mut session, KeyEvent::ArrowDown);
    assert_eq!(session.state(), ImeState::Input);
    assert_eq!(session.composing_status(), ComposingStatus::ShowPinyin);
    assert_eq!(resp.marked.map(|m| m.text).as_deref(), Some("ni hao"));
}

#[test]
fn arrow_in_raw_view_switches_to_editing() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");
    press(&mut session, KeyEvent::ArrowUp);

    press(&mut session, KeyEvent::ArrowLeft);
    assert_eq!(session.composing_status(), ComposingStatus::EditPinyin);
    assert_eq!(session.decoding().spelling().cursor(), 5);

    press(&mut session, KeyEvent::ArrowLeft);
    assert_eq!(session.decoding().spelling().cursor(), 4);
}

#[test]
fn digits_are_spelling_while_composing() {
    let (mut session, _) = make_session();
    type_str(&mut session, "u");
    assert_eq!(session.state(), ImeState::Composing);

    type_str(&mut session, "12");
    assert_eq!(session.decoding().spelling().as_str(), "u12");
    assert_eq!(session.state(), ImeState::Composing);
}

// --- Lifecycle ---

#[test]
fn bypass_ignores_keys_until_restart() {
    let (mut session, _) = make_session();
    session.enter_bypass();
    assert_eq!(session.state(), ImeState::Bypass);
    assert!(!press(&mut session, KeyEvent::ch('n')).consumed);

    session.start_input(FieldHints::default(), true);
    assert_eq!(session.state(), ImeState::Idle);
    assert!(press(&mut session, KeyEvent::ch('n')).consumed);
}

#[test]
fn finish_input_drops_composition() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");

    let resp = session.finish_input();
    assert_eq!(resp.commit, None);
    assert_eq!(session.state(), ImeState::Idle);
    assert!(session.decoding().spelling().is_empty());
}

#[test]
fn context_keeps_trailing_committed_chars() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");
    press(&mut session, KeyEvent::ch(','));
    assert_eq!(session.committed_context(), "你好，");

    type_str(&mut session, "wo");
    press(&mut session, KeyEvent::Enter);
    assert_eq!(session.committed_context(), "，wo");
}

#[test]
fn context_stays_bounded_over_long_input() {
    let (mut session, _) = make_session();
    for _ in 0..1000 {
        press(&mut session, KeyEvent::ch(','));
    }
    assert_eq!(session.committed_context(), "，，，");
}

#[test]
fn context_is_dropped_with_focus() {
    let (mut session, _) = make_session();
    type_str(&mut session, "nihao");
    press(&mut session, KeyEvent::space());
    assert_eq!(session.committed_context(), "你好");

    session.finish_input();
    assert_eq!(session.committed_context(), "");

    type_str(&mut session, "ni");
    press(&mut session, KeyEvent::space());
    session.enter_bypass();
    assert_eq!(session.committed_context(), "");
}

#[test]
fn password_commits_are_not_context() {
    let (mut session, _) = make_session();
    session.start_input(FieldHints::text(TextVariation::Password), true);
    let responses = type_str(&mut session, "pw9");
    assert_eq!(committed(&responses), "pw9");
    assert_eq!(session.committed_context(), "");
}

#[test]
fn typed_sentence_commits_in_order() {
    let (mut session, _) = make_session();
    let mut responses = type_str(&mut session, "nihao,");
    responses.extend(type_str(&mut session, "ni"));
    responses.push(press(&mut session, KeyEvent::space()));

    assert_eq!(committed(&responses), "你好，你");
}
