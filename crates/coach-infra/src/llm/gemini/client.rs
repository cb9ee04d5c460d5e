//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Talks to the Generative Language REST API: `models/{model}:generateContent`
//! for one-shot requests and `models/{model}:streamGenerateContent?alt=sse`
//! for streamed replies.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed in
//! the `x-goog-api-key` request header, never in URLs or logs.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};

use coach_core::llm::provider::LlmProvider;
use coach_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, StreamEvent, Usage,
};

use super::super::{error_for_status, http_client, normalize_base_url};
use super::streaming::{map_api_error, map_finish_reason, map_gemini_sse};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

// No Debug derive: the struct holds the API key.

impl GeminiProvider {
    /// Create a new Gemini provider for `model` (e.g. "gemini-2.5-flash").
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for proxies or a local mock server).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Build the endpoint URL for `method` on the request's model.
    fn url(&self, model: &str, method: &str) -> String {
        let model = if model.is_empty() { &self.model } else { model };
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{model}:{method}", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a Gemini request body.
    ///
    /// Assistant turns become `model` turns. System messages in the history
    /// are folded into the system instruction.
    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let mut system_parts: Vec<Part> = request.system.iter().map(Part::text).collect();
        let mut contents = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            let role = match message.role {
                MessageRole::System => {
                    system_parts.push(Part::text(message.content.clone()));
                    continue;
                }
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            };
            contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![Part::text(message.content.clone())],
            });
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        });

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_gemini_request(request);
        let url = self.url(&request.model, "generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Gemini API error response");
            return Err(error_for_status(status, error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        if let Some(error) = gemini_resp.error.clone() {
            return Err(map_api_error(error));
        }

        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.clone().unwrap_or_default(),
            content: gemini_resp.text(),
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            stop_reason: gemini_resp
                .finish_reason()
                .map(map_finish_reason)
                .unwrap_or(StopReason::EndTurn),
            usage,
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let body = self.to_gemini_request(&request);
        let url = format!("{}?alt=sse", self.url(&request.model, "streamGenerateContent"));
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        Box::pin(async_stream::try_stream! {
            let response = client
                .post(&url)
                .header("x-goog-api-key", api_key.expose_secret())
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::Provider {
                    message: format!("HTTP request failed: {e}"),
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                tracing::warn!(status = %status, "Gemini stream API error response");
                Err(error_for_status(status, error_body))?;
                return;
            }

            yield StreamEvent::Connected;

            let mut events = map_gemini_sse(response.bytes_stream());
            while let Some(event) = events.next().await {
                yield event?;
            }
        })
    }
}
