//! Prompt Builder
//!
//! Renders the instruction sent to the provider from a data template. The
//! template wording (level guidance, category taxonomy) lives in
//! `prompt_template.txt` and can be replaced through configuration.

use super::types::Level;
use crate::config::ConfigError;
use std::path::Path;

/// Nouns requested per generation.
pub const WORDS_PER_REQUEST: usize = 20;

const DEFAULT_TEMPLATE: &str = include_str!("prompt_template.txt");

const COUNT: &str = "{count}";
const LEVEL: &str = "{level}";
const EXCLUDED: &str = "{excluded}";

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Accepts a template only if it carries every placeholder.
    pub fn new(text: impl Into<String>) -> Result<Self, ConfigError> {
        let text = text.into();
        for placeholder in [COUNT, LEVEL, EXCLUDED] {
            if !text.contains(placeholder) {
                return Err(ConfigError::TemplatePlaceholder(placeholder));
            }
        }
        Ok(Self { text })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(text)
    }

    /// Configured template file, or the built-in wording.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let template = Self::from_file(path)?;
                log::info!("Loaded prompt template from {}", path.display());
                Ok(template)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Single pass substitution, so placeholder-looking text inside the
    /// level or the excluded words is never expanded again.
    pub fn render(&self, level: &Level, excluded: &[String]) -> String {
        let count = WORDS_PER_REQUEST.to_string();
        let excluded = quote_list(excluded);

        let mut out = String::with_capacity(self.text.len() + excluded.len());
        let mut rest = self.text.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let (value, len) = if tail.starts_with(COUNT) {
                (count.as_str(), COUNT.len())
            } else if tail.starts_with(LEVEL) {
                (level.as_str(), LEVEL.len())
            } else if tail.starts_with(EXCLUDED) {
                (excluded.as_str(), EXCLUDED.len())
            } else {
                ("{", 1)
            };
            out.push_str(value);
            rest = &tail[len..];
        }
        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// `"a", "b", "c"`
fn quote_list(words: &[String]) -> String {
    words
        .iter()
        .map(|w| format!("\"{w}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the instruction for one generation with the built-in template.
pub fn build_prompt(level: &Level, excluded: &[String]) -> String {
    PromptTemplate::default().render(level, excluded)
}
