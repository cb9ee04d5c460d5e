//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Chunks carry `choices[0].delta.content`. Usage arrives in a final chunk
//! with an empty `choices` array when `stream_options.include_usage` is set.
//! The stream ends with a literal `[DONE]` payload.

use std::fmt;
use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};

use coach_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::ChatCompletionChunk;

pub(crate) fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "length" => StopReason::MaxTokens,
        "content_filter" => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    }
}

fn process_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("openai stream chunk: {e}")))?;

    let mut events = Vec::new();
    for choice in &chunk.choices {
        if let Some(text) = choice.delta.content.as_ref().filter(|t| !t.is_empty()) {
            events.push(StreamEvent::TextDelta { text: text.clone() });
        }
        if let Some(reason) = &choice.finish_reason {
            events.push(StreamEvent::MessageDelta {
                stop_reason: map_finish_reason(reason),
            });
        }
    }

    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::Usage(Usage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }));
    }

    Ok(events)
}

/// Map a raw SSE byte stream to provider-agnostic stream events.
pub(crate) fn map_openai_sse<S, B, E>(
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
            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            if data == "[DONE]" {
                break;
            }
            for stream_event in process_chunk(data)? {
                yield stream_event;
            }
        }

        yield StreamEvent::Done;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sse_body(
        frames: Vec<&'static str>,
    ) -> impl Stream<Item = Result<&'static str, std::io::Error>> + Send + 'static {
        futures_util::stream::iter(frames.into_iter().map(Ok::<_, std::io::Error>))
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(map_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(map_finish_reason("content_filter"), StopReason::ContentFilter);
    }

    #[test]
    fn test_usage_only_chunk() {
        let events =
            process_chunk(r#"{"choices":[],"usage":{"prompt_tokens":10,"completion_tokens":4}}"#)
                .unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::Usage(Usage {
                input_tokens: 10,
                output_tokens: 4
            })]
        );
    }

    #[tokio::test]
    async fn test_map_openai_sse_until_done_marker() {
        let body = sse_body(vec![
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Walk me\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" through it.\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
        ]);

        let events: Vec<StreamEvent> = map_openai_sse(body)
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta {
                    text: "Walk me".to_string()
                },
                StreamEvent::TextDelta {
                    text: " through it.".to_string()
                },
                StreamEvent::MessageDelta {
                    stop_reason: StopReason::EndTurn
                },
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_map_openai_sse_malformed_chunk() {
        let body = sse_body(vec!["data: {oops\n\n"]);
        let items: Vec<Result<StreamEvent, LlmError>> = map_openai_sse(body).collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(LlmError::Deserialization(_))));
    }
}
