//! Decoding engine seam.
//!
//! The Pinyin-to-Hanzi search itself lives outside this crate. The session
//! talks to it through the synchronous [`DecodingEngine`] trait; every call
//! blocks until the engine answers or fails.

mod lexicon;
mod memory;

pub use lexicon::{parse_lexicon_toml, LexiconError, MemoryLexicon, DEFAULT_LEXICON_TOML};
pub use memory::{DecoderCall, MemoryDecoder, MemoryProbe};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecoderError {
    /// No connection to the engine, or the connection was lost.
    #[error("engine unavailable")]
    Unavailable,
    /// The engine answered with an error for this request.
    #[error("engine call failed: {0}")]
    CallFailed(String),
}

/// Incremental Pinyin decoder.
///
/// The engine keeps its own search state between calls: `search_full`
/// starts over from a spelling, `choose` locks a candidate into the fixed
/// prefix, and the accessors report the result of the most recent step.
///
/// Segment boundaries are returned as `[count, start_0, .., start_{count-1}, end]`
/// where the starts are byte offsets into the spelling string and `end` is
/// the decoded length.
pub trait DecodingEngine {
    /// Clear engine-side incremental search state.
    fn reset(&mut self) -> Result<(), DecoderError>;

    /// Decode a complete spelling. Returns the candidate count.
    fn search_full(&mut self, spelling: &str) -> Result<usize, DecoderError>;

    /// Re-decode after deleting either one spelling character at `position`
    /// or, with `segment_granularity`, the whole segment with index `position`.
    fn search_after_delete(
        &mut self,
        position: usize,
        segment_granularity: bool,
        clear_fixed_prefix: bool,
    ) -> Result<usize, DecoderError>;

    /// Lock candidate `index` into the fixed prefix. Returns the new count.
    fn choose(&mut self, index: usize) -> Result<usize, DecoderError>;

    /// Candidate 0 is always the full sentence, fixed prefix included.
    fn fetch_candidate(&mut self, index: usize) -> Result<String, DecoderError>;

    /// Fetch up to `count` candidates from `start`. The first
    /// `trim_prefix_len` characters are dropped from candidate 0 so that it
    /// lines up with the other (unfixed-only) candidates.
    fn fetch_candidate_range(
        &mut self,
        start: usize,
        count: usize,
        trim_prefix_len: usize,
    ) -> Result<Vec<String>, DecoderError>;

    fn predict_count(&mut self, context: &str) -> Result<usize, DecoderError>;

    fn fetch_prediction(&mut self, index: usize) -> Result<String, DecoderError>;

    fn spelling_string(&mut self, decoded_only: bool) -> Result<String, DecoderError>;

    fn segment_boundaries(&mut self) -> Result<Vec<usize>, DecoderError>;

    fn fixed_length(&mut self) -> Result<usize, DecoderError>;
}
