use std::fs;
use std::io::{self, Read};
use std::process;

use serde::Serialize;
use tracing::info;

use pinyin_core::decoder::MemoryDecoder;
use pinyin_core::mode::FieldHints;
use pinyin_session::{CandidateAction, InputSession, KeyEvent, KeyResponse};

use super::config_ops::{load_lexicon, load_settings};
use crate::script::parse_script;

/// What one key did, as printed by `replay`.
#[derive(Debug, Serialize)]
pub struct ReplayStep {
    pub key: String,
    pub state: String,
    pub consumed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked: Option<String>,
    pub candidates: CandidateView,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CandidateView {
    Keep,
    Hide,
    Show {
        page: usize,
        items: Vec<String>,
        active: usize,
    },
}

impl From<&CandidateAction> for CandidateView {
    fn from(action: &CandidateAction) -> Self {
        match action {
            CandidateAction::Keep => CandidateView::Keep,
            CandidateAction::Hide => CandidateView::Hide,
            CandidateAction::Show { page, active, .. } => CandidateView::Show {
                page: page.number,
                items: page.candidates.clone(),
                active: *active,
            },
        }
    }
}

fn step(session: &InputSession, event: KeyEvent, resp: &KeyResponse) -> ReplayStep {
    ReplayStep {
        key: format!("{event:?}"),
        state: format!("{:?}", session.state()),
        consumed: resp.consumed,
        commit: resp.commit.clone(),
        marked: resp.marked.as_ref().map(|m| m.text.clone()),
        candidates: CandidateView::from(&resp.candidates),
    }
}

/// Feed `events` through `session`, one step per key.
pub fn run_script(session: &mut InputSession, events: &[KeyEvent]) -> Vec<ReplayStep> {
    events
        .iter()
        .map(|&event| {
            let resp = session.handle_key(event);
            step(session, event, &resp)
        })
        .collect()
}

pub fn replay_cmd(script_file: &str, lexicon: Option<&str>, settings: Option<&str>, json: bool) {
    let script = if script_file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(script_file)
    }
    .unwrap_or_else(|e| {
        eprintln!("Error reading {script_file}: {e}");
        process::exit(1);
    });
    let events = parse_script(&script).unwrap_or_else(|e| {
        eprintln!("Error in script: {e}");
        process::exit(1);
    });

    let settings = load_settings(settings);
    let engine = MemoryDecoder::new(load_lexicon(lexicon));
    let mut session = InputSession::new(Box::new(engine), &settings);
    session.start_input(FieldHints::default(), true);
    info!(keys = events.len(), "replaying script");

    let steps = run_script(&mut session, &events);
    let committed: String = steps.iter().filter_map(|s| s.commit.as_deref()).collect();

    for s in &steps {
        if json {
            println!(
                "{}",
                serde_json::to_string(s).expect("JSON serialization failed")
            );
        } else {
            println!("{}", format_step(s));
        }
    }
    if json {
        let summary = serde_json::json!({ "committed": committed });
        println!("{summary}");
    } else {
        println!("---");
        println!("committed: {committed}");
    }
}

fn format_step(s: &ReplayStep) -> String {
    let mut line = format!("{:<24} {:<14}", s.key, s.state);
    if !s.consumed {
        line.push_str(" (passed through)");
    }
    if let Some(commit) = &s.commit {
        line.push_str(&format!(" commit={commit:?}"));
    }
    if let Some(marked) = s.marked.as_deref().filter(|m| !m.is_empty()) {
        line.push_str(&format!(" marked={marked:?}"));
    }
    if let CandidateView::Show {
        page,
        items,
        active,
    } = &s.candidates
    {
        let items: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(i, c)| if i == *active { format!("[{c}]") } else { c.clone() })
            .collect();
        line.push_str(&format!(" p{page}: {}", items.join(" ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use pinyin_core::decoder::MemoryLexicon;
    use pinyin_core::settings::Settings;

    use super::*;

    fn session() -> InputSession {
        let engine = MemoryDecoder::new(MemoryLexicon::default());
        let mut session = InputSession::new(Box::new(engine), &Settings::default());
        session.start_input(FieldHints::default(), true);
        session
    }

    #[test]
    fn replay_commits_chosen_sentence() {
        let events = parse_script("nihao{space}{del}").unwrap();
        let steps = run_script(&mut session(), &events);

        assert_eq!(steps.len(), 7);
        assert_eq!(steps[5].commit.as_deref(), Some("你好"));
        assert_eq!(steps[5].state, "Predict");
        assert_eq!(steps[6].state, "Idle");
    }

    #[test]
    fn step_shows_candidate_page() {
        let events = parse_script("ni").unwrap();
        let steps = run_script(&mut session(), &events);

        assert_eq!(steps[1].marked.as_deref(), Some("ni"));
        assert_eq!(
            steps[1].candidates,
            CandidateView::Show {
                page: 0,
                items: vec!["你".to_string(), "泥".to_string(), "尼".to_string()],
                active: 0,
            }
        );
        assert_eq!(format_step(&steps[1]).matches("[你]").count(), 1);
    }

    #[test]
    fn json_step_is_tagged() {
        let events = parse_script("{enter}").unwrap();
        let steps = run_script(&mut session(), &events);
        let json = serde_json::to_value(&steps[0]).unwrap();

        assert_eq!(json["commit"], "\n");
        assert_eq!(json["candidates"]["action"], "hide");
    }
}
