use std::fs;
use std::process;

use pinyin_core::decoder::{parse_lexicon_toml, MemoryLexicon, DEFAULT_LEXICON_TOML};
use pinyin_core::settings::{parse_settings_toml, Settings};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", pinyin_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let s = load_settings(Some(file));
    println!(
        "OK: spelling.max_len={}, candidates.page_size={}, candidates.fetch_chunk={}, prediction.context_chars={}",
        s.spelling.max_len,
        s.candidates.page_size,
        s.candidates.fetch_chunk,
        s.prediction.context_chars
    );
}

pub fn lexicon_export() {
    print!("{DEFAULT_LEXICON_TOML}");
}

pub fn lexicon_validate(file: &str) {
    let lexicon = load_lexicon(Some(file));
    println!(
        "OK: {} syllables, {} phrases",
        lexicon.syllable_count(),
        lexicon.phrase_count()
    );
}

/// Settings from `file`, or the embedded defaults.
pub fn load_settings(file: Option<&str>) -> Settings {
    match file {
        Some(file) => {
            let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
            die!(parse_settings_toml(&content), "Error in {file}: {}")
        }
        None => Settings::default(),
    }
}

/// Lexicon from `file`, or the embedded default.
pub fn load_lexicon(file: Option<&str>) -> MemoryLexicon {
    match file {
        Some(file) => {
            let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
            die!(parse_lexicon_toml(&content), "Error in {file}: {}")
        }
        None => MemoryLexicon::default(),
    }
}
