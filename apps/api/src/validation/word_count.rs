use serde::{Deserialize, Serialize};

/// Counts whitespace-delimited words after trimming. Blank text counts as 0.
pub fn count_words(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.split_whitespace().count()
}

/// Inclusive word-count bounds for a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRange {
    pub min: usize,
    pub max: usize,
}

impl WordRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, words: usize) -> bool {
        (self.min..=self.max).contains(&words)
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.contains(count_words(text))
    }
}

pub const PROJECT_DESC_WORDS: WordRange = WordRange::new(10, 30);
pub const INTERNSHIP_DESC_WORDS: WordRange = WordRange::new(10, 40);
