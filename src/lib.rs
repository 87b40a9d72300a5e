/// Noun Forge - Vocabulary Generation Service
///
/// Core library providing the LLM-backed noun generation pipeline, the
/// exclusion store that keeps batches from repeating, and the HTTP service
/// exposing both to word-game clients.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
