//! OpenAI-compatible chat completions provider.
//!
//! Covers any server speaking the `/chat/completions` dialect (OpenAI,
//! Ollama, LM Studio, vLLM, OpenRouter).

pub mod client;
pub mod streaming;
pub mod types;

pub use client::OpenAiCompatibleProvider;
