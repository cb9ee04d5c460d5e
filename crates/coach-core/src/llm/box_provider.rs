//! Runtime-selected model backend.
//!
//! The CLI only learns which backend to talk to (Gemini or an
//! OpenAI-compatible server) after reading config, while the interview
//! client wants a single concrete type. [`BoxLlmProvider`] is that type.

use std::future::Future;
use std::pin::Pin;

use coach_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::{EventStream, LlmProvider};

type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// [`LlmProvider`] with its completion future boxed so it can sit behind
/// `dyn`. Implemented for every provider.
pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;

    fn stream_events(&self, request: CompletionRequest) -> EventStream;
}

impl<P: LlmProvider> LlmProviderDyn for P {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(LlmProvider::complete(self, request))
    }

    fn stream_events(&self, request: CompletionRequest) -> EventStream {
        LlmProvider::stream(self, request)
    }
}

/// The interviewer backend handed to [`InterviewClient`].
///
/// [`InterviewClient`]: crate::interview::client::InterviewClient
pub struct BoxLlmProvider {
    backend: Box<dyn LlmProviderDyn>,
}

impl BoxLlmProvider {
    pub fn new<P: LlmProvider + 'static>(provider: P) -> Self {
        Self {
            backend: Box::new(provider),
        }
    }

    /// Backend name used in log and span fields.
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// One-shot request, used for the opening question and the report.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.backend.complete_boxed(request).await
    }

    /// Streamed request, used for interview turns.
    pub fn stream(&self, request: CompletionRequest) -> EventStream {
        self.backend.stream_events(request)
    }
}

impl std::fmt::Debug for BoxLlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxLlmProvider")
            .field("backend", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use coach_types::llm::{Message, StreamEvent};

    use super::*;
    use crate::llm::testing::{Chunk, Reply, ScriptedProvider};

    fn request(stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![Message::user("Tell me about a hard bug.")],
            system: None,
            max_tokens: 256,
            temperature: None,
            stream,
        }
    }

    #[tokio::test]
    async fn test_boxed_backend_forwards_completion() {
        let provider = ScriptedProvider::new().reply(Reply::Text("What was the root cause?"));
        let requests = provider.requests();
        let backend = provider.boxed();

        assert_eq!(backend.name(), "scripted");
        let response = backend.complete(&request(false)).await.unwrap();
        assert_eq!(response.content, "What was the root cause?");
        assert_eq!(requests.lock().unwrap()[0].model, "test-model");
    }

    #[tokio::test]
    async fn test_boxed_backend_forwards_stream() {
        let backend = ScriptedProvider::new()
            .stream_script(vec![Chunk::Text("Go "), Chunk::Text("on.")])
            .boxed();

        let text: String = backend
            .stream(request(true))
            .filter_map(|event| async move {
                match event {
                    Ok(StreamEvent::TextDelta { text }) => Some(text),
                    _ => None,
                }
            })
            .collect()
            .await;
        assert_eq!(text, "Go on.");
    }

    #[test]
    fn test_debug_shows_backend_name() {
        let backend = ScriptedProvider::new().boxed();
        assert_eq!(format!("{backend:?}"), r#"BoxLlmProvider { backend: "scripted" }"#);
    }
}
