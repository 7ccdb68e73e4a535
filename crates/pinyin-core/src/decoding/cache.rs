/// Candidates of the current generation, fetched lazily and split into pages.
///
/// `page_starts[p]` is the cache index of page `p`'s first item. Page `p` is
/// closed once `page_starts[p + 1]` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCache {
    items: Vec<String>,
    total: usize,
    page_starts: Vec<usize>,
}

impl Default for CandidateCache {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page_starts: vec![0],
        }
    }
}

impl CandidateCache {
    /// Start a new generation.
    pub fn reset(&mut self) {
        self.items.clear();
        self.total = 0;
        self.page_starts.clear();
        self.page_starts.push(0);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = String>) {
        self.items.extend(items);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Count reported by the engine; may exceed what is cached.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    pub fn page_starts(&self) -> &[usize] {
        &self.page_starts
    }

    pub fn page_start(&self, page: usize) -> usize {
        self.page_starts.get(page).copied().unwrap_or(self.total)
    }

    pub fn page_len(&self, page: usize) -> usize {
        match (self.page_starts.get(page), self.page_starts.get(page + 1)) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        }
    }

    pub fn is_page_closed(&self, page: usize) -> bool {
        self.page_starts.len() > page + 1
    }

    pub fn page_forwardable(&self, page: usize) -> bool {
        self.page_starts
            .get(page + 1)
            .is_some_and(|&next| next < self.total)
    }

    pub fn page_backwardable(&self, page: usize) -> bool {
        page > 0
    }

    /// Record where page `page + 1` starts, once page `page` has items.
    pub(super) fn close_page(&mut self, page: usize, page_size: usize) {
        if self.page_starts.len() != page + 1 {
            return;
        }
        let start = self.page_starts[page];
        if start < self.items.len() {
            self.page_starts
                .push(start + page_size.min(self.items.len() - start));
        }
    }

    pub fn page(&self, page: usize) -> Option<CandidatePage> {
        let start = *self.page_starts.get(page)?;
        let end = *self.page_starts.get(page + 1)?;
        Some(CandidatePage {
            number: page,
            start,
            candidates: self.items.get(start..end)?.to_vec(),
        })
    }
}

/// One page of candidates as handed to the candidate view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePage {
    pub number: usize,
    /// Cache index of `candidates[0]`.
    pub start: usize,
    pub candidates: Vec<String>,
}

impl CandidatePage {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, local: usize) -> Option<&str> {
        self.candidates.get(local).map(String::as_str)
    }
}
