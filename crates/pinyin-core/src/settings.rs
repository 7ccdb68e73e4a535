//! Session settings loaded from TOML.
//!
//! Settings are an explicit value: callers parse them once and hand them to
//! `DecodingSession::new`, `ModeSwitcher::new` and the session state machine.
//! Default values are embedded via `include_str!("default_settings.toml")`.

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Largest number of candidates the engine hands out per fetch.
pub const MAX_FETCH_CHUNK: usize = 10;

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub spelling: SpellingSettings,
    pub candidates: CandidateSettings,
    pub prediction: PredictionSettings,
    pub preferences: Preferences,
    pub environment: EnvironmentSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpellingSettings {
    pub max_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateSettings {
    pub page_size: usize,
    pub fetch_chunk: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictionSettings {
    pub context_chars: usize,
}

/// Read-only user preferences. Key sound and vibration are carried for the
/// host's feedback layer; only `prediction` changes session behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Preferences {
    pub key_sound: bool,
    pub vibrate: bool,
    pub prediction: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentSettings {
    pub hard_keyboard: bool,
}

impl Settings {
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Builder-style override used by hosts that keep preferences elsewhere.
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(spelling.max_len);
    check_positive_usize!(candidates.page_size);
    check_positive_usize!(candidates.fetch_chunk);
    check_positive_usize!(prediction.context_chars);

    if s.spelling.max_len < 2 {
        return Err(SettingsError::InvalidValue {
            field: "spelling.max_len".to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    if s.candidates.fetch_chunk > MAX_FETCH_CHUNK {
        return Err(SettingsError::InvalidValue {
            field: "candidates.fetch_chunk".to_string(),
            reason: format!("must not exceed {MAX_FETCH_CHUNK}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &str = r#"
[spelling]
max_len = 16

[candidates]
page_size = 4
fetch_chunk = 5

[prediction]
context_chars = 2

[preferences]
key_sound = false
vibrate = true
prediction = false

[environment]
hard_keyboard = true
"#;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.spelling.max_len, 28);
        assert_eq!(s.candidates.page_size, 6);
        assert_eq!(s.candidates.fetch_chunk, 10);
        assert_eq!(s.prediction.context_chars, 3);
        assert!(s.preferences.key_sound);
        assert!(!s.preferences.vibrate);
        assert!(s.preferences.prediction);
        assert!(!s.environment.hard_keyboard);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn parse_valid_custom_toml() {
        let s = parse_settings_toml(CUSTOM).unwrap();
        assert_eq!(s.spelling.max_len, 16);
        assert_eq!(s.candidates.page_size, 4);
        assert_eq!(
            s.preferences(),
            Preferences {
                key_sound: false,
                vibrate: true,
                prediction: false,
            }
        );
        assert!(s.environment.hard_keyboard);
    }

    #[test]
    fn error_zero_page_size() {
        let toml = CUSTOM.replace("page_size = 4", "page_size = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("candidates.page_size"));
    }

    #[test]
    fn error_fetch_chunk_too_large() {
        let toml = CUSTOM.replace("fetch_chunk = 5", "fetch_chunk = 11");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("candidates.fetch_chunk"));
    }

    #[test]
    fn error_tiny_buffer() {
        let toml = CUSTOM.replace("max_len = 16", "max_len = 1");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("spelling.max_len"));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("[spelling]\nmax_len = 28\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn preferences_override() {
        let prefs = Preferences {
            key_sound: false,
            vibrate: false,
            prediction: false,
        };
        let s = Settings::default().with_preferences(prefs);
        assert!(!s.preferences().prediction);
    }
}
