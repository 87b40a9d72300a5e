use crate::core::llm::LLMError;
use thiserror::Error;

/// Failures of a generation request.
///
/// Too few accepted words is not an error; see [`super::Outcome`].
#[derive(Debug, Error)]
pub enum WordsError {
    /// Request validation failed; nothing was generated or recorded.
    #[error("Level is required")]
    MissingLevel,

    /// The provider call failed; the exclusion store was not touched.
    #[error("provider call failed: {0}")]
    Provider(#[from] LLMError),
}
