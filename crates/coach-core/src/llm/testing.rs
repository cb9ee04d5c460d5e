//! Scripted provider shared by the core test modules.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures_util::Stream;

use coach_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent, Usage,
};

use super::box_provider::BoxLlmProvider;
use super::provider::LlmProvider;

/// One scripted step of a streamed reply.
#[derive(Clone)]
pub(crate) enum Chunk {
    Text(&'static str),
    Fail,
}

/// Outcome of a scripted `complete` call.
#[derive(Clone)]
pub(crate) enum Reply {
    Text(&'static str),
    Fail,
}

/// Provider that replays scripted replies and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    streams: Mutex<VecDeque<Vec<Chunk>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn stream_script(self, chunks: Vec<Chunk>) -> Self {
        self.streams.lock().unwrap().push_back(chunks);
        self
    }

    /// Handle for inspecting requests after the provider is boxed.
    pub(crate) fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }

    pub(crate) fn boxed(self) -> BoxLlmProvider {
        BoxLlmProvider::new(self)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        let model = request.model.clone();
        async move {
            match reply {
                Some(Reply::Text(text)) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.to_string(),
                    model,
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Some(Reply::Fail) | None => Err(LlmError::Provider {
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.requests.lock().unwrap().push(request);
        let chunks = self.streams.lock().unwrap().pop_front().unwrap_or_default();
        Box::pin(async_stream::stream! {
            yield Ok(StreamEvent::Connected);
            for chunk in chunks {
                match chunk {
                    Chunk::Text(text) => yield Ok(StreamEvent::TextDelta { text: text.to_string() }),
                    Chunk::Fail => {
                        yield Err(LlmError::Stream("connection reset".to_string()));
                        return;
                    }
                }
            }
            yield Ok(StreamEvent::MessageDelta { stop_reason: StopReason::EndTurn });
            yield Ok(StreamEvent::Done);
        })
    }
}
