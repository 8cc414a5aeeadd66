//! Text-completion implementations.

pub mod openai;

pub use openai::OpenAiCompletion;
