use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::lexicon::{MemoryLexicon, Syllable};
use super::{DecoderError, DecodingEngine};

/// One request as seen by [`MemoryDecoder`], recorded for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderCall {
    Reset,
    SearchFull(String),
    SearchAfterDelete {
        position: usize,
        segment: bool,
        clear_fixed: bool,
    },
    Choose(usize),
    FetchCandidate(usize),
    FetchCandidateRange {
        start: usize,
        count: usize,
        trim: usize,
    },
    PredictCount(String),
    FetchPrediction(usize),
    SpellingString(bool),
    SegmentBoundaries,
    FixedLength,
}

#[derive(Debug, Default)]
struct ProbeState {
    calls: Vec<DecoderCall>,
    disconnected: bool,
    fail_next: bool,
}

/// Shared handle onto a [`MemoryDecoder`] that stays usable after the
/// decoder has been boxed into a session: call log plus fault injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe(Rc<RefCell<ProbeState>>);

impl MemoryProbe {
    pub fn calls(&self) -> Vec<DecoderCall> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    /// Every following call fails with `Unavailable` until `reconnect`.
    pub fn disconnect(&self) {
        self.0.borrow_mut().disconnected = true;
    }

    pub fn reconnect(&self) {
        self.0.borrow_mut().disconnected = false;
    }

    /// The next call fails with `CallFailed`.
    pub fn fail_next(&self) {
        self.0.borrow_mut().fail_next = true;
    }

    fn enter(&self, call: DecoderCall) -> Result<(), DecoderError> {
        let mut state = self.0.borrow_mut();
        trace!(?call, "memory decoder call");
        state.calls.push(call);
        if state.disconnected {
            return Err(DecoderError::Unavailable);
        }
        if std::mem::take(&mut state.fail_next) {
            return Err(DecoderError::CallFailed("injected failure".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Fixed {
    /// Raw spelling of the segment, separator included.
    spelling: String,
    hanzi: char,
}

#[derive(Debug, Clone)]
struct Candidate {
    text: String,
    /// Unfixed segments this candidate consumes when chosen.
    span: usize,
}

/// In-memory decoding engine over a [`MemoryLexicon`].
///
/// Segments are decoded greedily, one Hanzi per segment. Candidate 0 is the
/// whole sentence; after it come phrases covering the longest run of
/// unfixed segments down to single-segment Hanzi.
#[derive(Debug)]
pub struct MemoryDecoder {
    lexicon: MemoryLexicon,
    spelling: String,
    segments: Vec<Syllable>,
    fixed: Vec<Fixed>,
    candidates: Vec<Candidate>,
    predictions: Vec<String>,
    probe: MemoryProbe,
}

impl MemoryDecoder {
    pub fn new(lexicon: MemoryLexicon) -> Self {
        Self {
            lexicon,
            spelling: String::new(),
            segments: Vec::new(),
            fixed: Vec::new(),
            candidates: Vec::new(),
            predictions: Vec::new(),
            probe: MemoryProbe::default(),
        }
    }

    pub fn probe(&self) -> MemoryProbe {
        self.probe.clone()
    }

    fn fixed_end(&self) -> usize {
        self.fixed.iter().map(|f| f.spelling.len()).sum()
    }

    fn decoded_len(&self) -> usize {
        self.segments.last().map_or(0, |s| s.end)
    }

    /// Rebuild segments and candidates, keeping the fixed prefix in place.
    fn redecode(&mut self) {
        let fixed_end = self.fixed_end();
        if !self.spelling.is_char_boundary(fixed_end)
            || self.spelling[..fixed_end] != self.fixed_spelling()
        {
            self.fixed.clear();
        }
        let fixed_end = self.fixed_end();

        let mut segments = Vec::with_capacity(self.fixed.len());
        let mut start = 0;
        for f in &self.fixed {
            segments.push(Syllable {
                start,
                end: start + f.spelling.len(),
                complete: true,
            });
            start += f.spelling.len();
        }
        segments.extend(
            self.lexicon
                .segment(&self.spelling[fixed_end..])
                .into_iter()
                .map(|s| Syllable {
                    start: s.start + fixed_end,
                    end: s.end + fixed_end,
                    complete: s.complete,
                }),
        );
        self.segments = segments;
        self.candidates = self.build_candidates();
    }

    fn fixed_spelling(&self) -> String {
        self.fixed.iter().map(|f| f.spelling.as_str()).collect()
    }

    fn segment_text(&self, seg: &Syllable) -> &str {
        &self.spelling[seg.start..seg.end]
    }

    fn build_candidates(&self) -> Vec<Candidate> {
        if self.segments.is_empty() {
            return Vec::new();
        }
        let fixed: String = self.fixed.iter().map(|f| f.hanzi).collect();
        let rest = &self.segments[self.fixed.len()..];

        let mut out = vec![Candidate {
            text: format!("{fixed}{}", self.best_sentence(rest)),
            span: rest.len(),
        }];
        fn push(text: String, span: usize, out: &mut Vec<Candidate>) {
            if !out.iter().any(|c| c.text == text) {
                out.push(Candidate { text, span });
            }
        }

        for span in (2..=rest.len()).rev() {
            let spelling: String = rest[..span]
                .iter()
                .map(|s| self.segment_text(s))
                .collect();
            for phrase in self.lexicon.phrases_for(&spelling, span) {
                push(phrase, span, &mut out);
            }
        }
        if let Some(first) = rest.first() {
            for hanzi in self.lexicon.hanzi_for(self.segment_text(first), first.complete) {
                push(hanzi, 1, &mut out);
            }
        }
        out
    }

    /// Left-to-right: the longest phrase at each position, else the first
    /// Hanzi of the segment, else the raw spelling.
    fn best_sentence(&self, segments: &[Syllable]) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < segments.len() {
            let phrase = (2..=segments.len() - i).rev().find_map(|span| {
                let spelling: String = segments[i..i + span]
                    .iter()
                    .map(|s| self.segment_text(s))
                    .collect();
                self.lexicon
                    .phrases_for(&spelling, span)
                    .into_iter()
                    .next()
                    .map(|p| (p, span))
            });
            if let Some((p, span)) = phrase {
                out.push_str(&p);
                i += span;
                continue;
            }
            let seg = &segments[i];
            match self.lexicon.hanzi_for(self.segment_text(seg), seg.complete).first() {
                Some(h) => out.push_str(h),
                None => out.push_str(self.segment_text(seg)),
            }
            i += 1;
        }
        out
    }

    fn candidate(&self, index: usize) -> Result<&Candidate, DecoderError> {
        self.candidates.get(index).ok_or_else(|| {
            DecoderError::CallFailed(format!(
                "candidate {index} out of range ({})",
                self.candidates.len()
            ))
        })
    }
}

impl DecodingEngine for MemoryDecoder {
    fn reset(&mut self) -> Result<(), DecoderError> {
        self.probe.enter(DecoderCall::Reset)?;
        self.spelling.clear();
        self.segments.clear();
        self.fixed.clear();
        self.candidates.clear();
        self.predictions.clear();
        Ok(())
    }

    fn search_full(&mut self, spelling: &str) -> Result<usize, DecoderError> {
        self.probe.enter(DecoderCall::SearchFull(spelling.to_string()))?;
        self.spelling = spelling.to_string();
        self.redecode();
        Ok(self.candidates.len())
    }

    fn search_after_delete(
        &mut self,
        position: usize,
        segment_granularity: bool,
        clear_fixed_prefix: bool,
    ) -> Result<usize, DecoderError> {
        self.probe.enter(DecoderCall::SearchAfterDelete {
            position,
            segment: segment_granularity,
            clear_fixed: clear_fixed_prefix,
        })?;

        if segment_granularity {
            if let Some(seg) = self.segments.get(position).cloned() {
                self.spelling.replace_range(seg.start..seg.end, "");
                if position < self.fixed.len() {
                    self.fixed.remove(position);
                }
            }
        } else {
            let fixed_end = self.fixed_end();
            // Character deletes never reach into the fixed prefix.
            if position >= fixed_end && position < self.spelling.len() {
                self.spelling.remove(position);
                if position == fixed_end && clear_fixed_prefix {
                    self.fixed.pop();
                }
            }
        }
        self.redecode();
        Ok(self.candidates.len())
    }

    fn choose(&mut self, index: usize) -> Result<usize, DecoderError> {
        self.probe.enter(DecoderCall::Choose(index))?;
        let cand = self.candidate(index)?.clone();
        let first = self.fixed.len();
        let chosen: Vec<Fixed> = self.segments[first..first + cand.span]
            .iter()
            .zip(cand.text.chars().skip(if index == 0 { first } else { 0 }))
            .map(|(seg, hanzi)| Fixed {
                spelling: self.segment_text(seg).to_string(),
                hanzi,
            })
            .collect();
        self.fixed.extend(chosen);
        self.redecode();
        Ok(self.candidates.len())
    }

    fn fetch_candidate(&mut self, index: usize) -> Result<String, DecoderError> {
        self.probe.enter(DecoderCall::FetchCandidate(index))?;
        Ok(self.candidate(index)?.text.clone())
    }

    fn fetch_candidate_range(
        &mut self,
        start: usize,
        count: usize,
        trim_prefix_len: usize,
    ) -> Result<Vec<String>, DecoderError> {
        self.probe.enter(DecoderCall::FetchCandidateRange {
            start,
            count,
            trim: trim_prefix_len,
        })?;
        let end = start.saturating_add(count).min(self.candidates.len());
        Ok((start..end)
            .map(|i| {
                let text = &self.candidates[i].text;
                if i == 0 {
                    text.chars().skip(trim_prefix_len).collect()
                } else {
                    text.clone()
                }
            })
            .collect())
    }

    fn predict_count(&mut self, context: &str) -> Result<usize, DecoderError> {
        self.probe
            .enter(DecoderCall::PredictCount(context.to_string()))?;
        self.predictions = self.lexicon.predictions_for(context);
        Ok(self.predictions.len())
    }

    fn fetch_prediction(&mut self, index: usize) -> Result<String, DecoderError> {
        self.probe.enter(DecoderCall::FetchPrediction(index))?;
        self.predictions.get(index).cloned().ok_or_else(|| {
            DecoderError::CallFailed(format!("prediction {index} out of range"))
        })
    }

    fn spelling_string(&mut self, decoded_only: bool) -> Result<String, DecoderError> {
        self.probe.enter(DecoderCall::SpellingString(decoded_only))?;
        Ok(if decoded_only {
            self.spelling[..self.decoded_len()].to_string()
        } else {
            self.spelling.clone()
        })
    }

    fn segment_boundaries(&mut self) -> Result<Vec<usize>, DecoderError> {
        self.probe.enter(DecoderCall::SegmentBoundaries)?;
        let mut out = Vec::with_capacity(self.segments.len() + 2);
        out.push(self.segments.len());
        out.extend(self.segments.iter().map(|s| s.start));
        out.push(self.decoded_len());
        Ok(out)
    }

    fn fixed_length(&mut self) -> Result<usize, DecoderError> {
        self.probe.enter(DecoderCall::FixedLength)?;
        Ok(self.fixed.len())
    }
}
