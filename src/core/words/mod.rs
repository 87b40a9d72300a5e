//! Word Generation Module
//!
//! The generation pipeline behind `/get-words`:
//! - `store`: banned + used exclusion set
//! - `prompt`: instruction template rendering
//! - `normalize`: provider text → candidate words
//! - `filter`: exclusion filtering and write-back
//! - `policy`: sufficient / insufficient decision
//! - `generator`: runs the steps against an `LLMProvider`

mod error;
pub mod filter;
pub mod generator;
pub mod normalize;
pub mod policy;
pub mod prompt;
pub mod store;
mod types;

pub use error::WordsError;
pub use filter::filter_and_accumulate;
pub use generator::{GenerationParams, WordGenerator};
pub use normalize::normalize_response;
pub use policy::{Outcome, MIN_ACCEPTED_WORDS};
pub use prompt::{build_prompt, PromptTemplate, WORDS_PER_REQUEST};
pub use store::ExclusionStore;
pub use types::{GenerationResult, Level};
