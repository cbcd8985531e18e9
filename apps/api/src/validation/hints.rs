use serde::Serialize;

use crate::draft::{ResumeDraft, LOGO_COUNT};
use crate::validation::rules::{checked_links, is_https};
use crate::validation::word_count::{
    count_words, WordRange, INTERNSHIP_DESC_WORDS, PROJECT_DESC_WORDS,
};

/// Live word counter state for one textarea.
#[derive(Debug, Clone, Serialize)]
pub struct WordCountHint {
    pub field: String,
    pub words: usize,
    pub range: WordRange,
    pub within_range: bool,
}

/// Non-blocking per-field hints the form renders while the user types.
///
/// Unlike the error map, these identify individual link fields and cover
/// every project row, not only the required ones.
#[derive(Debug, Clone, Serialize)]
pub struct FieldHints {
    pub word_counts: Vec<WordCountHint>,
    pub invalid_links: Vec<String>,
    pub logos_selected: usize,
    pub logos_required: usize,
}

fn word_hint(field: String, text: &str, range: WordRange) -> WordCountHint {
    let words = count_words(text);
    WordCountHint {
        field,
        words,
        range,
        within_range: range.contains(words),
    }
}

pub fn compute_field_hints(draft: &ResumeDraft) -> FieldHints {
    let mut word_counts: Vec<WordCountHint> = draft
        .projects
        .iter()
        .enumerate()
        .map(|(i, p)| word_hint(format!("projects.{i}.desc"), &p.desc, PROJECT_DESC_WORDS))
        .collect();
    word_counts.push(word_hint(
        "internship.desc".to_string(),
        &draft.internship.desc,
        INTERNSHIP_DESC_WORDS,
    ));

    let invalid_links = checked_links(draft)
        .into_iter()
        .filter(|(_, url)| !is_https(url))
        .map(|(path, _)| path)
        .collect();

    FieldHints {
        word_counts,
        invalid_links,
        logos_selected: draft.logos.len(),
        logos_required: LOGO_COUNT,
    }
}
