//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `coach-core`, and a provider factory ([`create_provider`]) that builds the
//! backend named in [`ProviderSettings`].
//!
//! [`LlmProvider`]: coach_core::llm::provider::LlmProvider

pub mod gemini;
pub mod openai_compat;

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::SecretString;

use coach_core::llm::box_provider::BoxLlmProvider;
use coach_types::config::ProviderSettings;
use coach_types::llm::{LlmError, ProviderKind};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from provider settings and a resolved API key.
pub fn create_provider(
    settings: &ProviderSettings,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    match settings.kind {
        ProviderKind::Gemini => {
            let mut provider = GeminiProvider::new(api_key, settings.model.clone())?;
            if let Some(base_url) = &settings.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderKind::OpenAiCompatible => {
            let mut provider = OpenAiCompatibleProvider::new(api_key, settings.model.clone())?;
            if let Some(base_url) = &settings.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(BoxLlmProvider::new(provider))
        }
    }
}

/// Shared HTTP client with a long timeout for slow generations.
pub(crate) fn http_client() -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .map_err(|e| LlmError::Provider {
            message: format!("failed to create HTTP client: {e}"),
        })
}

/// Map a non-success HTTP status to an [`LlmError`].
pub(crate) fn error_for_status(status: StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        503 | 529 => LlmError::Overloaded(body),
        400 => LlmError::InvalidRequest(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// Strip a trailing slash so paths can be appended with `format!`.
pub(crate) fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
