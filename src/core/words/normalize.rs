//! Response Normalizer
//!
//! Turns the provider's free text into candidate words.

use super::store::normalize_word;

/// Split on commas, trim, lower-case and drop empty fragments.
///
/// Order is preserved and repeats are kept; de-duplication happens when the
/// candidates are filtered against the exclusion store.
pub fn normalize_response(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}
