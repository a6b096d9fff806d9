//! Term matching
//!
//! Plain case-insensitive substring search. No word boundaries and no
//! normalisation beyond lowercasing, so "rate" also matches "inflation rates"
//! and "generate".

/// Terms found in `text`, in the order they were configured.
///
/// `text` is expected to be lowercase already (see `extract`).
pub fn match_terms<'a, S: AsRef<str>>(text: &str, terms: &'a [S]) -> Vec<&'a str> {
    terms
        .iter()
        .map(AsRef::as_ref)
        .filter(|term| contains_term(text, term))
        .collect()
}

pub fn contains_term(text: &str, term: &str) -> bool {
    text.contains(term.to_lowercase().as_str())
}
