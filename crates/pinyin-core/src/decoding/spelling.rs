use crate::ImeError;

/// Raw spelling typed so far plus the editing cursor.
///
/// Spelling characters are ASCII, so byte offsets and character offsets
/// coincide. The buffer holds at most `max_len - 1` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingBuffer {
    text: String,
    cursor: usize,
    max_len: usize,
}

impl SpellingBuffer {
    pub fn new(max_len: usize) -> Self {
        Self {
            text: String::with_capacity(max_len),
            cursor: 0,
            max_len,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.max_len.saturating_sub(1)
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Insert at the cursor and step past the new character.
    pub fn insert(&mut self, ch: char) -> Result<(), ImeError> {
        if self.is_full() {
            return Err(ImeError::BufferFull {
                capacity: self.capacity(),
            });
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        Ok(())
    }

    pub fn remove(&mut self, pos: usize) -> Option<char> {
        if pos >= self.text.len() || !self.text.is_char_boundary(pos) {
            return None;
        }
        let ch = self.text.remove(pos);
        if self.cursor > pos {
            self.cursor -= ch.len_utf8();
        }
        Some(ch)
    }

    pub fn remove_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.text.len());
        if start >= end {
            return;
        }
        self.text.replace_range(start..end, "");
        if self.cursor > end {
            self.cursor -= end - start;
        } else if self.cursor > start {
            self.cursor = start;
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.text.len());
    }

    /// Adopt the spelling kept by the engine. The cursor is clamped.
    pub fn replace(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = self.cursor.min(self.text.len());
    }

    pub fn char_before_cursor(&self) -> Option<char> {
        self.text.get(..self.cursor)?.chars().next_back()
    }
}
