use crate::decoder::DecoderError;

/// Every recoverable condition the input session can run into.
///
/// None of these ever reach the host text surface: the session state
/// machine matches on them, logs, and degrades locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImeError {
    #[error("decoding engine unavailable")]
    EngineUnavailable,

    #[error("decoding engine call failed: {0}")]
    EngineCallFailed(String),

    #[error("malformed unicode escape {token:?}: {reason}")]
    MalformedUnicodeEscape { token: String, reason: String },

    #[error("candidate index {index} outside the {loaded} loaded candidates")]
    InvalidSelectionIndex { index: usize, loaded: usize },

    #[error("spelling buffer full (capacity {capacity})")]
    BufferFull { capacity: usize },
}

impl From<DecoderError> for ImeError {
    fn from(e: DecoderError) -> Self {
        match e {
            DecoderError::Unavailable => ImeError::EngineUnavailable,
            DecoderError::CallFailed(msg) => ImeError::EngineCallFailed(msg),
        }
    }
}
