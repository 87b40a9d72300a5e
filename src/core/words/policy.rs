//! Retry-Signal Policy

use serde::Serialize;

/// Fewer accepted words than this asks the caller to request again.
pub const MIN_ACCEPTED_WORDS: usize = 10;

/// Whether a batch is large enough to hand out as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Sufficient,
    /// The caller should re-issue the request; the service never retries.
    Insufficient,
}

impl Outcome {
    pub fn for_count(accepted: usize) -> Self {
        if accepted < MIN_ACCEPTED_WORDS {
            Outcome::Insufficient
        } else {
            Outcome::Sufficient
        }
    }
}
