//! Application state shared by the CLI commands.
//!
//! Resolves the data directory and loads `config.toml` once at startup.

use std::path::PathBuf;

use anyhow::Context;

use coach_core::llm::box_provider::BoxLlmProvider;
use coach_infra::config::{config_path, load_config, resolve_api_key_from_env, resolve_data_dir};
use coach_infra::llm::create_provider;
use coach_types::config::{CoachConfig, ProviderSettings};

pub struct AppState {
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
    pub config: CoachConfig,
}

impl AppState {
    /// Load configuration from `config_override` or `{data_dir}/config.toml`.
    pub async fn init(config_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config_path = config_override.unwrap_or_else(|| config_path(&data_dir));
        let config = load_config(&config_path).await?;

        tracing::debug!(
            path = %config_path.display(),
            provider = %config.provider.kind,
            model = %config.provider.model,
            "configuration loaded"
        );

        Ok(Self {
            data_dir,
            config_path,
            config,
        })
    }

    /// Provider settings with an optional model override applied.
    pub fn provider_settings(&self, model: Option<&str>) -> ProviderSettings {
        let mut settings = self.config.provider.clone();
        if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
            settings.model = model.to_string();
        }
        settings
    }

    /// Build the provider named in the config, reading the key from the
    /// environment.
    pub fn create_provider(&self, settings: &ProviderSettings) -> anyhow::Result<BoxLlmProvider> {
        let api_key = resolve_api_key_from_env(settings)?;
        create_provider(settings, api_key).context("failed to create model provider")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState {
            data_dir: PathBuf::from("/tmp/coach"),
            config_path: PathBuf::from("/tmp/coach/config.toml"),
            config: CoachConfig::default(),
        }
    }

    #[test]
    fn test_model_override_applies() {
        let settings = state().provider_settings(Some(" gemini-2.5-pro "));
        assert_eq!(settings.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_blank_model_override_is_ignored() {
        let settings = state().provider_settings(Some("   "));
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(state().provider_settings(None).model, "gemini-2.5-flash");
    }
}
