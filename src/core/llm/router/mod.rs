//! LLM Provider Contract
//!
//! The `LLMProvider` trait every completion backend implements, plus the
//! error type shared by all of them.

mod types;

pub use types::{ChatMessage, ChatRequest, ChatResponse, MessageRole, TokenUsage};

use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by a provider call
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limited, retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl LLMError {
    /// Upstream HTTP status, when the provider answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            LLMError::HttpError(e) => e.status().map(|s| s.as_u16()),
            LLMError::ApiError { status, .. } => Some(*status),
            LLMError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LLMError>;

// ============================================================================
// Provider Trait
// ============================================================================

/// A chat completion backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Stable provider identifier (e.g. "openai")
    fn id(&self) -> &str;

    /// Human readable name
    fn name(&self) -> &str;

    /// Model requests are sent to
    fn model(&self) -> &str;

    /// Cheap readiness check; does not call the network
    async fn health_check(&self) -> bool;

    /// Run a single, non-streaming completion
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
