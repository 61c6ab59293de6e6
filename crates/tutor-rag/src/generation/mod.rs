//! Generation backend: LLM client and prompt templates

pub mod client;
pub mod prompt;

pub use client::{ChatMessage, GenerationClient};
pub use prompt::PromptBuilder;
