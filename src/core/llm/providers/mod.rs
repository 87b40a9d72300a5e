//! LLM Provider Implementations
//!
//! Concrete implementations of the `LLMProvider` trait and the config-driven
//! factory that picks one.

mod openai;

pub use openai::{OpenAIProvider, DEFAULT_MODEL, OPENAI_BASE_URL};

use super::router::{LLMProvider, Result};
use crate::config::ProviderSettings;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider.
pub fn create_provider(settings: &ProviderSettings) -> Result<Arc<dyn LLMProvider>> {
    let provider = OpenAIProvider::new(
        settings.api_key.clone().unwrap_or_default(),
        settings.model.clone(),
        Some(settings.base_url.clone()),
        settings.request_timeout_secs.map(Duration::from_secs),
    )?;
    Ok(Arc::new(provider))
}
