//! Decoding session: spelling buffer, composition and the paged candidate
//! cache, kept in step with a [`DecodingEngine`].
//!
//! Every engine failure is absorbed here. `EngineUnavailable` resets the
//! whole session; any other failure empties the composition and candidate
//! list. The error is still returned so the state machine can move on.

mod cache;
mod composition;
mod spelling;

pub use cache::{CandidateCache, CandidatePage};
pub use composition::{Composition, SegmentBoundaries};
pub use spelling::SpellingBuffer;

use tracing::{debug, warn};

use crate::decoder::DecodingEngine;
use crate::settings::Settings;
use crate::ImeError;

/// A delete marked by `prepare_delete_before_cursor`, sent with the next search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    /// Segment index when `segment` is set, else spelling offset.
    pub position: usize,
    pub segment: bool,
}

/// Where page fetches take their candidates from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CandidateSource {
    #[default]
    Decoder,
    Prediction,
    AppCompletions(Vec<String>),
}

/// Everything the session owns besides the engine handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingState {
    spelling: SpellingBuffer,
    composition: Composition,
    cache: CandidateCache,
    pending_delete: Option<PendingDelete>,
    source: CandidateSource,
}

pub struct DecodingSession {
    engine: Box<dyn DecodingEngine>,
    state: DecodingState,
    page_size: usize,
    fetch_chunk: usize,
}

impl DecodingSession {
    pub fn new(engine: Box<dyn DecodingEngine>, settings: &Settings) -> Self {
        Self {
            engine,
            state: DecodingState {
                spelling: SpellingBuffer::new(settings.spelling.max_len),
                composition: Composition::default(),
                cache: CandidateCache::default(),
                pending_delete: None,
                source: CandidateSource::Decoder,
            },
            page_size: settings.candidates.page_size,
            fetch_chunk: settings.candidates.fetch_chunk,
        }
    }

    // --- accessors ---

    pub fn state(&self) -> &DecodingState {
        &self.state
    }

    pub fn spelling(&self) -> &SpellingBuffer {
        &self.state.spelling
    }

    pub fn composition(&self) -> &Composition {
        &self.state.composition
    }

    pub fn cache(&self) -> &CandidateCache {
        &self.state.cache
    }

    pub fn source(&self) -> &CandidateSource {
        &self.state.source
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.state.pending_delete
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_full(&self) -> bool {
        self.state.spelling.is_full()
    }

    /// Clear buffer, cursor, composition and cache. Engine state is left
    /// alone; the next `append_char(_, true)` resets it.
    pub fn reset(&mut self) {
        self.state.spelling.clear();
        self.state.composition = Composition::default();
        self.state.cache.reset();
        self.state.pending_delete = None;
        self.state.source = CandidateSource::Decoder;
    }

    pub fn reset_candidates(&mut self) {
        self.state.cache.reset();
    }

    // --- spelling edits ---

    pub fn append_char(&mut self, ch: char, reset_first: bool) -> Result<(), ImeError> {
        if reset_first {
            self.state.spelling.clear();
            self.state.composition.decoded_len = 0;
            if let Err(e) = self.engine.reset() {
                warn!(error = %e, "engine reset failed");
            }
        }
        self.state.spelling.insert(ch)
    }

    /// Mark what the next search deletes. Inside a fixed segment the whole
    /// segment goes and the cursor snaps to its start; elsewhere one
    /// character before the cursor.
    pub fn prepare_delete_before_cursor(&mut self) {
        let cursor = self.state.spelling.cursor();
        if cursor == 0 {
            return;
        }
        let comp = &self.state.composition;
        if self.segments_consistent() {
            for pos in 0..comp.fixed_len {
                let Some((start, end)) = comp.boundaries.segment(pos) else {
                    break;
                };
                if start < cursor && cursor <= end {
                    self.state.pending_delete = Some(PendingDelete {
                        position: pos,
                        segment: true,
                    });
                    self.state.spelling.set_cursor(start);
                    return;
                }
            }
        } else if comp.fixed_len > 0 {
            warn!(
                fixed_len = comp.fixed_len,
                boundaries = ?comp.boundaries,
                "segmentation disagrees with fixed length, deleting by character"
            );
        }
        self.state.pending_delete = Some(PendingDelete {
            position: cursor - 1,
            segment: false,
        });
        self.state.spelling.set_cursor(cursor - 1);
    }

    /// Whether the engine's segmentation can be trusted for cursor and
    /// delete mapping.
    fn segments_consistent(&self) -> bool {
        let comp = &self.state.composition;
        comp.boundaries.is_consistent(comp.fixed_len, self.state.spelling.len())
    }

    pub fn char_before_cursor_is_separator(&self) -> bool {
        self.state.spelling.char_before_cursor() == Some('\'')
    }

    // --- engine round trips ---

    /// Decode the spelling, or apply the pending delete. The delete is
    /// mirrored locally first so the buffer stays sane if the engine fails.
    pub fn search(&mut self, clear_fixed_on_delete: bool) -> Result<usize, ImeError> {
        self.state.cache.reset();
        self.state.source = CandidateSource::Decoder;
        let pending = self.state.pending_delete.take();

        if let Some(delete) = pending {
            self.apply_delete_locally(delete);
        }
        if self.state.spelling.is_empty() && pending.is_none() {
            self.state.composition = Composition::default();
            return Ok(0);
        }

        let result = match pending {
            None => {
                debug!(spelling = self.state.spelling.as_str(), "search");
                self.engine.search_full(self.state.spelling.as_str())
            }
            Some(delete) => {
                debug!(?delete, clear_fixed_on_delete, "search after delete");
                self.engine.search_after_delete(
                    delete.position,
                    delete.segment,
                    clear_fixed_on_delete,
                )
            }
        };
        let result = result
            .map_err(ImeError::from)
            .and_then(|total| self.read_composition(total));
        self.settle(result)
    }

    /// Lock loaded candidate `index` into the fixed prefix.
    pub fn choose(&mut self, index: usize) -> Result<usize, ImeError> {
        let loaded = self.state.cache.len();
        if index >= loaded {
            return Err(ImeError::InvalidSelectionIndex { index, loaded });
        }
        self.state.cache.reset();
        self.state.source = CandidateSource::Decoder;
        debug!(index, "choose");
        let result = self
            .engine
            .choose(index)
            .map_err(ImeError::from)
            .and_then(|total| self.read_composition(total));
        self.settle(result)
    }

    /// The chosen prediction becomes the whole, fully fixed composition.
    pub fn choose_prediction(&mut self, index: usize) -> Result<(), ImeError> {
        let text = self
            .state
            .cache
            .get(index)
            .ok_or(ImeError::InvalidSelectionIndex {
                index,
                loaded: self.state.cache.len(),
            })?
            .to_string();
        self.state.cache.reset();
        self.state.cache.extend([text.clone()]);
        self.state.cache.set_total(1);
        self.state.spelling.clear();
        self.state.composition = Composition::fixed(text);
        Ok(())
    }

    /// Switch the candidate source to predictions for `context`.
    pub fn predict(&mut self, context: &str) -> Result<usize, ImeError> {
        self.state.cache.reset();
        self.state.source = CandidateSource::Prediction;
        self.state.composition.selection_finished = false;
        debug!(context, "predict");
        let result = self.engine.predict_count(context).map_err(ImeError::from);
        let result = self.settle(result)?;
        self.state.cache.set_total(result);
        self.prepare_page(0);
        Ok(result)
    }

    pub fn prepare_app_completions(&mut self, completions: Vec<String>) {
        self.state.cache.reset();
        self.state.cache.set_total(completions.len());
        self.state.source = CandidateSource::AppCompletions(completions);
        self.state.composition.selection_finished = false;
        self.prepare_page(0);
    }

    fn read_composition(&mut self, total: usize) -> Result<usize, ImeError> {
        let spelling = self.engine.spelling_string(false)?;
        let decoded_len = self.engine.spelling_string(true)?.len();
        let full_sentence = if total > 0 {
            self.engine.fetch_candidate(0)?
        } else {
            String::new()
        };
        let fixed_len = self.engine.fixed_length()?;
        let boundaries = SegmentBoundaries::new(self.engine.segment_boundaries()?);

        self.state.spelling.replace(&spelling);
        self.state.composition =
            Composition::assemble(&spelling, decoded_len, full_sentence, fixed_len, boundaries);
        self.state.cache.set_total(total);
        debug!(
            total,
            fixed_len = self.state.composition.fixed_len,
            composing = %self.state.composition.composing,
            "decoded"
        );

        if !self.state.composition.selection_finished {
            self.prepare_page(0);
        }
        Ok(total)
    }

    fn apply_delete_locally(&mut self, delete: PendingDelete) {
        if delete.segment {
            if let Some((start, end)) = self.state.composition.boundaries.segment(delete.position) {
                self.state.spelling.remove_range(start, end);
            }
        } else {
            self.state.spelling.remove(delete.position);
        }
    }

    fn settle(&mut self, result: Result<usize, ImeError>) -> Result<usize, ImeError> {
        if let Err(e) = &result {
            warn!(error = %e, "decoding request failed");
            match e {
                ImeError::EngineUnavailable => self.reset(),
                _ => {
                    self.state.composition = Composition::default();
                    self.state.cache.reset();
                }
            }
        }
        result
    }

    // --- pages ---

    /// Page `page`, fetching from the current source as needed. Pages must be
    /// reached in order.
    pub fn get_page(&mut self, page: usize) -> Option<CandidatePage> {
        if !self.prepare_page(page) {
            return None;
        }
        self.state.cache.page(page)
    }

    fn prepare_page(&mut self, page: usize) -> bool {
        if self.state.cache.page_starts().len() <= page {
            return false;
        }
        if self.state.cache.is_page_closed(page) {
            return true;
        }
        let start = self.state.cache.page_start(page);
        while self.state.cache.len() - start < self.page_size
            && self.state.cache.len() < self.state.cache.total()
        {
            match self.fetch_chunk() {
                Ok(0) => {
                    let len = self.state.cache.len();
                    debug!(len, "source ran dry before reported total");
                    self.state.cache.set_total(len);
                }
                Ok(_) => {}
                Err(ImeError::EngineUnavailable) => {
                    warn!(page, "engine lost while fetching candidates");
                    self.reset();
                    return false;
                }
                Err(e) => {
                    warn!(error = %e, page, "candidate fetch failed");
                    let len = self.state.cache.len();
                    self.state.cache.set_total(len);
                }
            }
        }
        self.state.cache.close_page(page, self.page_size);
        self.state.cache.is_page_closed(page)
    }

    fn fetch_chunk(&mut self) -> Result<usize, ImeError> {
        let start = self.state.cache.len();
        let count = (self.state.cache.total() - start).min(self.fetch_chunk);
        let items = match &self.state.source {
            CandidateSource::Decoder => self.engine.fetch_candidate_range(
                start,
                count,
                self.state.composition.fixed_len,
            )?,
            CandidateSource::Prediction => (start..start + count)
                .map(|i| self.engine.fetch_prediction(i))
                .collect::<Result<Vec<_>, _>>()?,
            CandidateSource::AppCompletions(list) => {
                list.iter().skip(start).take(count).cloned().collect()
            }
        };
        debug!(start, fetched = items.len(), "fetched candidates");
        let fetched = items.len();
        self.state.cache.extend(items);
        Ok(fetched)
    }

    // --- candidates ---

    /// Loaded candidate `index`.
    pub fn candidate(&self, index: usize) -> Option<&str> {
        self.state.cache.get(index)
    }

    /// The fixed prefix followed by decoder candidate `index`; predictions
    /// and completions stand alone.
    pub fn current_full_sentence(&self, index: usize) -> Option<String> {
        let candidate = self.candidate(index)?;
        Some(match self.state.source {
            CandidateSource::Decoder => {
                format!("{}{candidate}", self.state.composition.fixed_prefix())
            }
            _ => candidate.to_string(),
        })
    }

    pub fn can_do_prediction(&self) -> bool {
        self.state.composition.composing_len() == self.state.composition.fixed_len
    }

    // --- cursor ---

    /// Step the cursor by one. Inside the fixed prefix a step covers a
    /// whole fixed segment.
    pub fn move_cursor(&mut self, offset: isize) {
        if !(-1..=1).contains(&offset) {
            return;
        }
        let cursor = self.state.spelling.cursor();
        let comp = &self.state.composition;
        let mut target = cursor as isize + offset;
        if offset != 0 && self.segments_consistent() {
            for hz in 0..=comp.fixed_len {
                if comp.boundaries.get(hz + 1) != Some(cursor) {
                    continue;
                }
                if offset < 0 && hz > 0 {
                    if let Some(prev) = comp.boundaries.get(hz) {
                        target = prev as isize;
                    }
                } else if offset > 0 && hz < comp.fixed_len {
                    if let Some(next) = comp.boundaries.get(hz + 2) {
                        target = next as isize;
                    }
                }
                break;
            }
        }
        self.state.spelling.set_cursor(target.max(0) as usize);
    }

    pub fn move_cursor_to_edge(&mut self, left: bool) {
        let pos = if left { 0 } else { self.state.spelling.len() };
        self.state.spelling.set_cursor(pos);
    }

    /// The cursor in `composing` coordinates: each fixed segment before it
    /// counts as one Hanzi. Skewed segmentation falls back to plain
    /// character offsets.
    pub fn cursor_in_composing(&self) -> usize {
        let cursor = self.state.spelling.cursor();
        let comp = &self.state.composition;
        if !self.segments_consistent() {
            return cursor.min(comp.composing_len());
        }
        let mut pos = cursor;
        for hz in 0..comp.fixed_len {
            if let Some((start, end)) = comp.boundaries.segment(hz) {
                if cursor >= end {
                    pos = pos.saturating_sub(end.saturating_sub(start)) + 1;
                }
            }
        }
        pos
    }

    /// The cursor in `display` coordinates, counting the inserted spaces.
    pub fn cursor_in_display(&self) -> usize {
        let cursor = self.state.spelling.cursor();
        let comp = &self.state.composition;
        let raw = comp.boundaries.as_slice();
        let mut pos = self.cursor_in_composing();
        if !self.segments_consistent() {
            return pos.min(comp.display.chars().count());
        }
        for &start in raw
            .iter()
            .take(raw.len().saturating_sub(1))
            .skip(comp.fixed_len + 2)
        {
            if cursor <= start {
                break;
            }
            pos += 1;
        }
        pos
    }
}
