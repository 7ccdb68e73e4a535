use tracing::warn;

/// Engine segmentation in wire order: `[count, start_0, .., start_{count-1}, end]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentBoundaries(Vec<usize>);

impl SegmentBoundaries {
    pub fn new(raw: Vec<usize>) -> Self {
        Self(raw)
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn segment_count(&self) -> usize {
        self.get(0).unwrap_or(0)
    }

    /// The count entry matches the vector and covers every fixed segment,
    /// and the offsets are ordered and fall inside the spelling.
    pub fn is_consistent(&self, fixed_len: usize, spelling_len: usize) -> bool {
        let offsets = self.0.get(1..).unwrap_or_default();
        self.0.len() >= fixed_len + 2
            && self.segment_count() + 2 == self.0.len()
            && offsets.windows(2).all(|w| w[0] <= w[1])
            && offsets.last().is_some_and(|&end| end <= spelling_len)
    }

    /// Spelling byte range of segment `index`.
    pub fn segment(&self, index: usize) -> Option<(usize, usize)> {
        Some((self.get(index + 1)?, self.get(index + 2)?))
    }
}

/// What the composing view shows, rebuilt after every engine round trip.
///
/// Lengths are in characters. `composing` is the fixed Hanzi followed by the
/// spelling that is not fixed yet; `display` is the same with a space
/// between decoded segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    pub full_sentence: String,
    pub fixed_len: usize,
    pub composing: String,
    pub active_len: usize,
    pub display: String,
    pub active_display_len: usize,
    pub decoded_len: usize,
    pub boundaries: SegmentBoundaries,
    pub selection_finished: bool,
}

impl Composition {
    pub fn assemble(
        spelling: &str,
        decoded_len: usize,
        full_sentence: String,
        fixed_len: usize,
        boundaries: SegmentBoundaries,
    ) -> Self {
        let decoded_len = decoded_len.min(spelling.len());
        let sentence_chars = full_sentence.chars().count();
        let fixed_len = if fixed_len > sentence_chars {
            warn!(
                fixed_len,
                sentence_chars, "fixed length beyond full sentence, clamping"
            );
            sentence_chars
        } else {
            fixed_len
        };
        let fixed: String = full_sentence.chars().take(fixed_len).collect();

        let tail_start = boundaries
            .get(fixed_len + 1)
            .unwrap_or(spelling.len())
            .min(spelling.len());
        let composing = format!("{fixed}{}", &spelling[tail_start..]);
        let composing_chars = composing.chars().count();
        let active_len = if decoded_len > 0 {
            composing_chars.saturating_sub(spelling.len() - decoded_len)
        } else {
            composing_chars
        };

        let (display, active_display_len) = if decoded_len == 0 {
            (composing.clone(), composing_chars)
        } else {
            let raw = boundaries.as_slice();
            let mut display = fixed.clone();
            for pos in fixed_len + 1..raw.len().saturating_sub(1) {
                let start = raw[pos].min(spelling.len());
                let end = raw[pos + 1].min(spelling.len());
                if start < end {
                    display.push_str(&spelling[start..end]);
                }
                if raw[pos + 1] < decoded_len {
                    display.push(' ');
                }
            }
            let active = display.chars().count();
            display.push_str(&spelling[decoded_len..]);
            (display, active)
        };

        let selection_finished = boundaries.len() == fixed_len + 2;

        Self {
            full_sentence,
            fixed_len,
            composing,
            active_len,
            display,
            active_display_len,
            decoded_len,
            boundaries,
            selection_finished,
        }
    }

    /// A composition that is entirely fixed text, as after choosing a
    /// prediction.
    pub fn fixed(text: String) -> Self {
        let len = text.chars().count();
        Self {
            full_sentence: text.clone(),
            fixed_len: len,
            composing: text.clone(),
            active_len: len,
            display: text,
            active_display_len: len,
            decoded_len: 0,
            boundaries: SegmentBoundaries::default(),
            selection_finished: true,
        }
    }

    /// The first `active_len` characters of the composing string.
    pub fn active_part(&self) -> String {
        self.composing.chars().take(self.active_len).collect()
    }

    pub fn fixed_prefix(&self) -> String {
        self.full_sentence.chars().take(self.fixed_len).collect()
    }

    pub fn composing_len(&self) -> usize {
        self.composing.chars().count()
    }
}
