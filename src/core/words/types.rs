//! Request and result types of the generation pipeline.

use super::error::WordsError;
use super::policy::Outcome;
use serde::Serialize;

/// Caller supplied difficulty label. Opaque: any non-blank string is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Level(String);

impl Level {
    /// A missing or blank level is a validation error.
    pub fn parse(raw: Option<&str>) -> Result<Self, WordsError> {
        match raw.map(str::trim) {
            Some(level) if !level.is_empty() => Ok(Self(level.to_string())),
            _ => Err(WordsError::MissingLevel),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepted words of one generation, in provider emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub words: Vec<String>,
    pub outcome: Outcome,
}

impl GenerationResult {
    pub fn new(words: Vec<String>) -> Self {
        let outcome = Outcome::for_count(words.len());
        Self { words, outcome }
    }

    pub fn count(&self) -> usize {
        self.words.len()
    }

    pub fn is_sufficient(&self) -> bool {
        self.outcome == Outcome::Sufficient
    }
}
