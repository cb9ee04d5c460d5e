//! SSE stream adapter for `streamGenerateContent?alt=sse`.
//!
//! Each SSE `data:` payload is a complete `GenerateContentResponse` holding
//! the next slice of reply text. The last payload carries `finishReason` and
//! the cumulative `usageMetadata`. Errors may arrive as an `error` object in
//! place of candidates.

use std::fmt;
use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};

use coach_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::{ApiError, GenerateContentResponse};

/// Map a Gemini finish reason string to a [`StopReason`].
pub(crate) fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            StopReason::ContentFilter
        }
        _ => StopReason::EndTurn,
    }
}

/// Convert an in-body API error into an [`LlmError`].
pub(crate) fn map_api_error(error: ApiError) -> LlmError {
    match (error.code, error.status.as_deref()) {
        (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => LlmError::RateLimited {
            retry_after_ms: None,
        },
        (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => {
            LlmError::AuthenticationFailed
        }
        (503, _) | (_, Some("UNAVAILABLE")) => LlmError::Overloaded(error.message),
        (400, _) | (_, Some("INVALID_ARGUMENT")) => LlmError::InvalidRequest(error.message),
        _ => LlmError::Provider {
            message: error.message,
        },
    }
}

/// Process one SSE data payload into zero or more [`StreamEvent`]s.
pub(crate) fn process_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let chunk: GenerateContentResponse = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("gemini stream chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(map_api_error(error));
    }

    let mut events = Vec::new();
    let text = chunk.text();
    if !text.is_empty() {
        events.push(StreamEvent::TextDelta { text });
    }

    if let Some(reason) = chunk.finish_reason() {
        events.push(StreamEvent::MessageDelta {
            stop_reason: map_finish_reason(reason),
        });
        if let Some(usage) = &chunk.usage_metadata {
            events.push(StreamEvent::Usage(Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            }));
        }
    }

    Ok(events)
}

/// Map a raw SSE byte stream to provider-agnostic stream events.
///
/// Emits `Done` once the body ends cleanly.
pub(crate) fn map_gemini_sse<S, B, E>(
    body: S,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut sse = Box::pin(body.eventsource());

        while let Some(event) = sse.next().await {
            let event = event.map_err(|e| LlmError::Stream(format!("SSE read: {e}")))?;
            if event.data.trim().is_empty() {
                continue;
            }
            for stream_event in process_chunk(&event.data)? {
                yield stream_event;
            }
        }

        yield StreamEvent::Done;
    })
}
