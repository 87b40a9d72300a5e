//! LLM Client Module
//!
//! Provider gateway for completion calls:
//! - `router`: the `LLMProvider` trait, request/response types and `LLMError`
//! - `providers`: concrete provider implementations

pub mod providers;
pub mod router;

pub use providers::{create_provider, OpenAIProvider};
pub use router::{
    ChatMessage, ChatRequest, ChatResponse, LLMError, LLMProvider, MessageRole, Result,
    TokenUsage,
};
