//! OpenAiCompatibleProvider -- [`LlmProvider`] over the `/chat/completions` API.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};

use coach_core::llm::provider::LlmProvider;
use coach_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, StreamEvent, Usage,
};

use super::super::{error_for_status, http_client, normalize_base_url};
use super::streaming::{map_finish_reason, map_openai_sse};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, StreamOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider for OpenAI and servers that mimic its chat completions API.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, request: &CompletionRequest, stream: bool) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(system.clone()),
            });
        }
        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: match m.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            }
            .to_string(),
            content: Some(m.content.clone()),
        }));

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        ChatCompletionRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
            stream_options: stream.then_some(StreamOptions {
                include_usage: true,
            }),
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(request, false);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "OpenAI-compatible API error response");
            return Err(error_for_status(status, error_body));
        }

        let resp: ChatCompletionResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let choice = resp.choices.first();
        Ok(CompletionResponse {
            id: resp.id.clone(),
            content: choice
                .and_then(|c| c.message.content.clone())
                .unwrap_or_default(),
            model: if resp.model.is_empty() {
                body.model
            } else {
                resp.model.clone()
            },
            stop_reason: choice
                .and_then(|c| c.finish_reason.as_deref())
                .map(map_finish_reason)
                .unwrap_or(StopReason::EndTurn),
            usage: resp
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                })
                .unwrap_or_default(),
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let body = self.build_request(&request, true);
        let url = self.url();
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        Box::pin(async_stream::try_stream! {
            let response = client
                .post(&url)
                .bearer_auth(api_key.expose_secret())
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::Provider {
                    message: format!("HTTP request failed: {e}"),
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                tracing::warn!(status = %status, "OpenAI-compatible stream error response");
                Err(error_for_status(status, error_body))?;
                return;
            }

            yield StreamEvent::Connected;

            let mut events = map_openai_sse(response.bytes_stream());
            while let Some(event) = events.next().await {
                yield event?;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_types::llm::Message;

    fn make_provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(SecretString::from("test-key-not-real"), "gpt-4o-mini".to_string())
            .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("Hi"), Message::assistant("Hello")],
            system: Some("Be an interviewer.".to_string()),
            max_tokens: 512,
            temperature: Some(0.7),
            stream: true,
        }
    }

    #[test]
    fn test_provider_name_and_url() {
        let provider = make_provider().with_base_url("http://localhost:11434/v1/".to_string());
        assert_eq!(provider.name(), "openai_compatible");
        assert_eq!(provider.url(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_build_request_prepends_system() {
        let body = make_provider().build_request(&request(), true);
        let roles: Vec<&str> = body.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
        assert_eq!(body.model, "gpt-4o-mini");
        assert!(body.stream_options.is_some());
    }

    #[test]
    fn test_build_request_json_omits_stream_options_when_not_streaming() {
        let mut req = request();
        req.system = None;
        let body = make_provider().build_request(&req, false);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("stream_options").is_none());
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
