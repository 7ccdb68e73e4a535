use std::collections::BTreeMap;

use serde::Deserialize;

pub const DEFAULT_LEXICON_TOML: &str = include_str!("default_lexicon.toml");

pub const SEPARATOR: char = '\'';

#[derive(Deserialize)]
struct LexiconFile {
    syllables: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    phrases: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    predictions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[syllables] table is empty")]
    Empty,
    #[error("syllable must be lowercase ASCII: {0}")]
    InvalidSyllable(String),
    #[error("empty entry for key: {0}")]
    EmptyEntry(String),
    #[error("phrase {phrase:?} does not match the {syllables} syllables of {key:?}")]
    PhraseLength {
        key: String,
        phrase: String,
        syllables: usize,
    },
}

/// Table-driven lexicon backing [`super::MemoryDecoder`].
#[derive(Debug, Clone)]
pub struct MemoryLexicon {
    syllables: BTreeMap<String, Vec<String>>,
    /// Keyed by the phrase spelling with separators removed.
    phrases: BTreeMap<String, Vec<String>>,
    predictions: BTreeMap<String, Vec<String>>,
}

impl Default for MemoryLexicon {
    fn default() -> Self {
        parse_lexicon_toml(DEFAULT_LEXICON_TOML).expect("embedded lexicon TOML must be valid")
    }
}

pub fn parse_lexicon_toml(toml_str: &str) -> Result<MemoryLexicon, LexiconError> {
    let file: LexiconFile =
        toml::from_str(toml_str).map_err(|e| LexiconError::Parse(e.to_string()))?;

    if file.syllables.is_empty() {
        return Err(LexiconError::Empty);
    }
    for (key, hanzi) in &file.syllables {
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(LexiconError::InvalidSyllable(key.clone()));
        }
        if hanzi.is_empty() || hanzi.iter().any(|h| h.chars().count() != 1) {
            return Err(LexiconError::EmptyEntry(key.clone()));
        }
    }

    let mut lexicon = MemoryLexicon {
        syllables: file.syllables,
        phrases: BTreeMap::new(),
        predictions: BTreeMap::new(),
    };

    for (key, words) in file.phrases {
        if words.is_empty() {
            return Err(LexiconError::EmptyEntry(key));
        }
        let syllables = lexicon.segment(&key);
        let covered = syllables.last().map_or(0, |s| s.end);
        if covered != key.len() || syllables.iter().any(|s| !s.complete) {
            return Err(LexiconError::InvalidSyllable(key));
        }
        for phrase in &words {
            if phrase.chars().count() != syllables.len() {
                return Err(LexiconError::PhraseLength {
                    key: key.clone(),
                    phrase: phrase.clone(),
                    syllables: syllables.len(),
                });
            }
        }
        lexicon
            .phrases
            .entry(strip_separators(&key))
            .or_default()
            .extend(words);
    }

    for (context, words) in file.predictions {
        if context.is_empty() || words.is_empty() {
            return Err(LexiconError::EmptyEntry(context));
        }
        lexicon.predictions.insert(context, words);
    }

    Ok(lexicon)
}

pub(super) fn strip_separators(spelling: &str) -> String {
    spelling.chars().filter(|&c| c != SEPARATOR).collect()
}

/// One decoded spelling segment, byte range into the spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Syllable {
    pub start: usize,
    pub end: usize,
    /// False for a trailing partial syllable such as `zh`.
    pub complete: bool,
}

impl MemoryLexicon {
    pub fn syllable_count(&self) -> usize {
        self.syllables.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.values().map(Vec::len).sum()
    }

    /// Greedy longest-match segmentation. A separator after a syllable is
    /// part of that syllable's segment. Stops at the first undecodable byte.
    pub(super) fn segment(&self, spelling: &str) -> Vec<Syllable> {
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < spelling.len() {
            let rest = &spelling[pos..];
            let full = self.longest_syllable(rest);
            let partial = !rest.contains(SEPARATOR)
                && rest.len() > full
                && self.syllables.keys().any(|k| k.starts_with(rest));

            let (len, complete) = if partial {
                (rest.len(), false)
            } else if full > 0 {
                (full, true)
            } else {
                break;
            };

            let mut end = pos + len;
            if spelling[end..].starts_with(SEPARATOR) {
                end += SEPARATOR.len_utf8();
            }
            out.push(Syllable {
                start: pos,
                end,
                complete,
            });
            pos = end;
        }
        out
    }

    fn longest_syllable(&self, rest: &str) -> usize {
        self.syllables
            .keys()
            .filter(|k| rest.starts_with(k.as_str()))
            .map(String::len)
            .max()
            .unwrap_or(0)
    }

    /// Hanzi for a (possibly partial) syllable, most likely first.
    pub(super) fn hanzi_for(&self, syllable: &str, complete: bool) -> Vec<String> {
        let syllable = strip_separators(syllable);
        if complete {
            return self.syllables.get(&syllable).cloned().unwrap_or_default();
        }
        let mut out: Vec<String> = Vec::new();
        for (key, hanzi) in &self.syllables {
            if !key.starts_with(&syllable) {
                continue;
            }
            for h in hanzi {
                if !out.contains(h) {
                    out.push(h.clone());
                }
            }
        }
        out
    }

    /// Phrases spelled exactly by `spelling` with `len` Hanzi.
    pub(super) fn phrases_for(&self, spelling: &str, len: usize) -> Vec<String> {
        self.phrases
            .get(&strip_separators(spelling))
            .map(|words| {
                words
                    .iter()
                    .filter(|w| w.chars().count() == len)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Predictions for the longest suffix of `context` that has any.
    pub(super) fn predictions_for(&self, context: &str) -> Vec<String> {
        let chars: Vec<char> = context.chars().collect();
        (0..chars.len())
            .map(|skip| chars[skip..].iter().collect::<String>())
            .find_map(|suffix| self.predictions.get(&suffix).cloned())
            .unwrap_or_default()
    }
}
