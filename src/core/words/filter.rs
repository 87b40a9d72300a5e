//! Filter & Accumulate

use super::store::ExclusionStore;

/// Keep candidates the store does not exclude and record them as used.
///
/// A word repeated inside the same batch is accepted once.
pub fn filter_and_accumulate(store: &ExclusionStore, candidates: Vec<String>) -> Vec<String> {
    store.accept_new(candidates)
}
