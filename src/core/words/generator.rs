//! Generation Pipeline
//!
//! prompt → provider → normalize → filter & accumulate → outcome.

use super::error::WordsError;
use super::filter::filter_and_accumulate;
use super::normalize::normalize_response;
use super::prompt::PromptTemplate;
use super::store::ExclusionStore;
use super::types::{GenerationResult, Level};
use crate::config::{ConfigError, GenerationSettings};
use crate::core::llm::{ChatMessage, ChatRequest, LLMProvider};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

// ============================================================================
// Generation Parameters
// ============================================================================

/// Sampling parameters sent with every generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Vec<String>,
}

impl GenerationParams {
    /// Single user message carrying the prompt.
    pub fn request_for(&self, prompt: String) -> ChatRequest {
        let mut request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_stop(self.stop.clone());
        if let Some(penalty) = self.frequency_penalty {
            request = request.with_frequency_penalty(penalty);
        }
        if let Some(penalty) = self.presence_penalty {
            request = request.with_presence_penalty(penalty);
        }
        request
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from(&GenerationSettings::default())
    }
}

impl From<&GenerationSettings> for GenerationParams {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            frequency_penalty: settings.frequency_penalty,
            presence_penalty: settings.presence_penalty,
            stop: settings.stop.clone(),
        }
    }
}

// ============================================================================
// Word Generator
// ============================================================================

/// Owns the exclusion store and runs the generation pipeline against a provider.
pub struct WordGenerator {
    provider: Arc<dyn LLMProvider>,
    store: Arc<ExclusionStore>,
    template: PromptTemplate,
    params: GenerationParams,
    /// Held from exclusion snapshot to write-back when serialization is on.
    gate: Option<Mutex<()>>,
}

impl WordGenerator {
    /// Built-in template, default parameters, serialized generations.
    pub fn new(provider: Arc<dyn LLMProvider>, store: Arc<ExclusionStore>) -> Self {
        Self {
            provider,
            store,
            template: PromptTemplate::default(),
            params: GenerationParams::default(),
            gate: Some(Mutex::new(())),
        }
    }

    /// Seed the store and load the template as configured.
    pub fn from_settings(
        provider: Arc<dyn LLMProvider>,
        settings: &GenerationSettings,
    ) -> Result<Self, ConfigError> {
        let store = Arc::new(ExclusionStore::new(&settings.banned_words));
        let template = PromptTemplate::load(settings.prompt_template_path.as_deref())?;

        Ok(Self::new(provider, store)
            .with_template(template)
            .with_params(GenerationParams::from(settings))
            .with_serialization(settings.serialize))
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// With `false`, concurrent generations may snapshot the same exclusions
    /// and hand out overlapping words.
    pub fn with_serialization(mut self, serialize: bool) -> Self {
        self.gate = serialize.then(|| Mutex::new(()));
        self
    }

    pub fn store(&self) -> &Arc<ExclusionStore> {
        &self.store
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Run one generation for `level`.
    ///
    /// On provider failure the store is left untouched. An insufficient batch
    /// is still recorded as used.
    pub async fn generate(&self, level: &Level) -> Result<GenerationResult, WordsError> {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };
        let generation_id = Uuid::new_v4();

        let excluded = self.store.snapshot();
        let prompt = self.template.render(level, &excluded);
        log::debug!(
            "[{}] Requesting nouns for level {} ({} excluded)",
            generation_id,
            level,
            excluded.len()
        );

        let response = self
            .provider
            .chat(self.params.request_for(prompt))
            .await
            .map_err(|e| {
                match e.status() {
                    Some(status) => log::error!("[{}] Provider status {}: {}", generation_id, status, e),
                    None => log::error!("[{}] Provider call failed: {}", generation_id, e),
                }
                WordsError::Provider(e)
            })?;
        log::debug!("[{}] Raw provider response:\n{}", generation_id, response.content);

        let candidates = normalize_response(&response.content);
        let accepted = filter_and_accumulate(&self.store, candidates);
        let result = GenerationResult::new(accepted);

        log::info!(
            "[{}] Generated {} words for level {}; {} unique words issued so far",
            generation_id,
            result.count(),
            level,
            self.store.used_len()
        );
        if !result.is_sufficient() {
            log::warn!(
                "[{}] Only {} usable words, caller should retry",
                generation_id,
                result.count()
            );
        }

        Ok(result)
    }

    /// Clear the used words. Banned words stay.
    pub fn reset(&self) -> usize {
        let cleared = self.store.reset();
        log::info!("Used word list reset ({} words cleared)", cleared);
        cleared
    }
}
