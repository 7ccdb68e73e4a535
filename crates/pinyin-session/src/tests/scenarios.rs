//! End-to-end key sequences through the session over the in-memory engine.

use pinyin_core::decoder::{DecoderCall, MemoryProbe};
use pinyin_core::mode::{FieldHints, InputMode, KeyFace, ModeTrigger, SoftKey, TextVariation};
use pinyin_core::settings::Settings;

use super::*;
use crate::types::{CandidateAction, ComposingStatus, ImeState};

#[test]
fn scenario_a_typing_and_choosing_one_syllable() {
    let (mut session, probe) = make_session();

    type_str(&mut session, "ni");
    assert_eq!(session.decoding().spelling().as_str(), "ni");
    assert_eq!(session.decoding().spelling().cursor(), 2);
    assert!(probe
        .calls()
        .contains(&DecoderCall::SearchFull("ni".to_string())));

    let resp = press(&mut session, KeyEvent::space());
    assert!(probe.calls().contains(&DecoderCall::Choose(0)));
    assert_eq!(resp.commit.as_deref(), Some("你"));
}

#[test]
fn scenario_b_delete_inside_fixed_segment() {
    let (mut session, probe) = make_session();
    type_str(&mut session, "woshi");

    // Fix 我 for "wo", leaving "shi" open.
    press(&mut session, KeyEvent::ch('2'));
    assert_eq!(session.state(), ImeState::Input);
    assert_eq!(session.decoding().composition().fixed_len, 1);
    assert_eq!(session.decoding().composition().composing, "我shi");

    press(&mut session, KeyEvent::ArrowUp);
    assert_eq!(session.state(), ImeState::Composing);
    assert_eq!(session.composing_status(), ComposingStatus::EditPinyin);

    for _ in 0..3 {
        press(&mut session, KeyEvent::ArrowLeft);
    }
    assert_eq!(session.decoding().spelling().cursor(), 2);

    probe.clear_calls();
    let resp = press(&mut session, KeyEvent::Delete);
    assert!(probe.calls().contains(&DecoderCall::SearchAfterDelete {
        position: 0,
        segment: true,
        clear_fixed: false,
    }));
    assert_eq!(session.decoding().composition().fixed_len, 0);
    assert_eq!(session.decoding().spelling().as_str(), "shi");
    assert_eq!(session.decoding().spelling().cursor(), 0);
    assert_eq!(resp.marked.map(|m| m.text).as_deref(), Some("shi"));
}

#[test]
fn scenario_c_full_choice_moves_to_prediction() {
    let (mut session, probe) = make_session();
    type_str(&mut session, "ni");

    probe.clear_calls();
    let resp = press(&mut session, KeyEvent::space());
    assert_eq!(session.state(), ImeState::Predict);

    let calls = probe.calls();
    assert!(calls.contains(&DecoderCall::PredictCount("你".to_string())));
    assert!(calls.contains(&DecoderCall::FetchPrediction(0)));
    assert!(!calls.iter().any(|c| matches!(c, DecoderCall::SearchFull(_))));
    assert!(matches!(resp.candidates, CandidateAction::Show { .. }));

    // Choosing a prediction commits it and predicts again from the longer context.
    probe.clear_calls();
    let resp = press(&mut session, KeyEvent::ch('1'));
    assert_eq!(resp.commit.as_deref(), Some("好"));
    assert!(probe
        .calls()
        .contains(&DecoderCall::PredictCount("你好".to_string())));
    assert_eq!(session.state(), ImeState::Predict);
}

#[test]
fn prediction_context_starts_fresh_in_each_field() {
    let (mut session, probe) = make_session();
    type_str(&mut session, "ni");
    press(&mut session, KeyEvent::space());
    session.finish_input();

    session.start_input(FieldHints::default(), true);
    type_str(&mut session, "ni");
    probe.clear_calls();
    press(&mut session, KeyEvent::space());
    let calls = probe.calls();
    assert!(calls.contains(&DecoderCall::PredictCount("你".to_string())));
    assert!(!calls.contains(&DecoderCall::PredictCount("你你".to_string())));
}

fn language_key() -> SoftKey {
    SoftKey::Static(KeyFace::mode(ModeTrigger::Language, "mode"))
}

fn predict_contexts(probe: &MemoryProbe) -> Vec<String> {
    probe
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            DecoderCall::PredictCount(context) => Some(context),
            _ => None,
        })
        .collect()
}

#[test]
fn password_field_text_never_reaches_prediction() {
    let (mut session, probe) = make_session();
    session.start_input(FieldHints::text(TextVariation::Password), true);
    type_str(&mut session, "pw9");
    session.finish_input();

    session.start_input(FieldHints::default(), true);
    assert_eq!(session.modes().mode(), InputMode::SKB_ENGLISH_LOWER);
    session.handle_soft_key(&language_key(), true);
    assert_eq!(session.modes().mode(), InputMode::SKB_CHINESE);

    type_str(&mut session, "ni");
    probe.clear_calls();
    press(&mut session, KeyEvent::space());
    assert_eq!(predict_contexts(&probe), ["你"]);
}

#[test]
fn english_commits_are_left_out_of_prediction() {
    let (mut session, probe) = make_session();
    session.handle_soft_key(&language_key(), true);
    assert_eq!(type_str(&mut session, "w9").len(), 2);
    session.handle_soft_key(&language_key(), true);
    assert_eq!(session.modes().mode(), InputMode::SKB_CHINESE);

    type_str(&mut session, "ni");
    probe.clear_calls();
    press(&mut session, KeyEvent::space());
    assert_eq!(predict_contexts(&probe), ["你"]);
}

#[test]
fn scenario_c_without_prediction_goes_idle() {
    let mut settings = Settings::default();
    settings.preferences.prediction = false;
    let (mut session, probe) = make_session_with(&settings);
    type_str(&mut session, "ni");

    probe.clear_calls();
    let resp = press(&mut session, KeyEvent::space());
    assert_eq!(resp.commit.as_deref(), Some("你"));
    assert_eq!(session.state(), ImeState::Idle);
    assert!(!probe
        .calls()
        .iter()
        .any(|c| matches!(c, DecoderCall::PredictCount(_))));
}

#[test]
fn scenario_d_raw_unicode_escape() {
    let (mut session, _) = make_session();
    type_str(&mut session, "unicode0x4f60");
    assert_eq!(session.state(), ImeState::Composing);
    assert_eq!(
        session.composing_status(),
        ComposingStatus::ShowStringLowercase
    );

    let resp = press(&mut session, KeyEvent::space());
    assert_eq!(resp.commit.as_deref(), Some("\u{4F60}"));
    assert_eq!(session.state(), ImeState::Idle);
}

#[test]
fn scenario_d_malformed_escape_commits_literally() {
    let (mut session, _) = make_session();
    type_str(&mut session, "unicode0xzz");

    let resp = press(&mut session, KeyEvent::Center);
    assert_eq!(resp.commit.as_deref(), Some("unicode0xzz"));
}

#[test]
fn scenario_e_digit_past_page_end_is_ignored() {
    let mut settings = Settings::default();
    settings.candidates.page_size = 2;
    let (mut session, probe) = make_session_with(&settings);
    type_str(&mut session, "ni");
    let before = session.decoding().state().clone();

    probe.clear_calls();
    let resp = press(&mut session, KeyEvent::ch('3'));
    assert!(resp.consumed);
    assert_eq!(resp.commit, None);
    assert_eq!(resp.candidates, CandidateAction::Keep);
    assert_eq!(session.state(), ImeState::Input);
    assert_eq!(session.decoding().state(), &before);
    assert!(probe.calls().is_empty());
}

#[test]
fn engine_loss_resets_to_idle() {
    let (mut session, probe) = make_session();
    type_str(&mut session, "ni");

    probe.disconnect();
    let resp = press(&mut session, KeyEvent::ch('h'));
    assert!(resp.consumed);
    assert_eq!(session.state(), ImeState::Idle);
    assert!(session.decoding().spelling().is_empty());

    probe.reconnect();
    type_str(&mut session, "ni");
    assert_eq!(session.state(), ImeState::Input);
}

#[test]
fn failed_call_degrades_to_empty_candidates() {
    let (mut session, probe) = make_session();
    type_str(&mut session, "ni");

    probe.fail_next();
    let resp = press(&mut session, KeyEvent::ch('h'));
    assert!(resp.consumed);
    assert_eq!(session.state(), ImeState::Idle);
    assert_eq!(resp.candidates, CandidateAction::Hide);
}
