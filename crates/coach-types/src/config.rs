//! Configuration file types.
//!
//! `CoachConfig` represents `config.toml` in the data directory. Every field
//! has a default, so a missing or empty file yields a working setup that
//! talks to Gemini with the key from `GEMINI_API_KEY`.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub provider: ProviderSettings,

    /// External speech-to-text program. Dictation is unavailable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictation: Option<DictationConfig>,
}

/// Which model backend to talk to and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider's default endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

pub fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: default_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// A command that records speech and prints the transcript on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictationConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = CoachConfig::default();
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
        assert!((config.provider.temperature - 0.7).abs() < f64::EPSILON);
        assert!(config.dictation.is_none());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: CoachConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.provider.max_tokens, 2048);
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
[provider]
kind = "openai_compatible"
model = "llama3.1"
base_url = "http://localhost:11434/v1"
api_key_env = "OLLAMA_KEY"
temperature = 0.2

[dictation]
command = "whisper-dictate"
args = ["--lang", "en"]
"#;
        let config: CoachConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::OpenAiCompatible);
        assert_eq!(config.provider.model, "llama3.1");
        assert_eq!(
            config.provider.base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert!((config.provider.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.provider.max_tokens, 2048);

        let dictation = config.dictation.unwrap();
        assert_eq!(dictation.command, "whisper-dictate");
        assert_eq!(dictation.args, vec!["--lang", "en"]);
    }

    #[test]
    fn test_dictation_args_default_empty() {
        let config: CoachConfig = toml::from_str("[dictation]\ncommand = \"stt\"\n").unwrap();
        assert!(config.dictation.unwrap().args.is_empty());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = CoachConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CoachConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.provider.model, config.provider.model);
    }
}
