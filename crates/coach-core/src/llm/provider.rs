//! The model backend port.
//!
//! `complete` returns an opaque future; `stream` already returns a boxed
//! [`EventStream`], so only the future needs boxing for dynamic dispatch.

use std::pin::Pin;

use futures_util::Stream;

use coach_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Reply events from a streaming request, owned by the caller.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for hosted model backends (Gemini, OpenAI-compatible servers).
///
/// Implementations are stateless with respect to the conversation: every
/// request carries the full message history it needs.
///
/// Implementations live in coach-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// The stream is lazy: no network traffic happens until it is polled.
    fn stream(&self, request: CompletionRequest) -> EventStream;
}
