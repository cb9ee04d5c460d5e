//! Configuration loader for the interview coach.
//!
//! Reads `config.toml` from the data directory (`~/.coach/` in production)
//! and deserializes it into [`CoachConfig`]. A missing file yields the
//! defaults; an unreadable or malformed file is an error so typos in the
//! provider section are not silently ignored.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use coach_types::config::{CoachConfig, ProviderSettings};
use coach_types::error::ConfigError;

/// Environment variable checked when the configured key variable is unset.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Resolve the data directory.
///
/// Priority:
/// 1. `COACH_DATA_DIR` environment variable
/// 2. `~/.coach`
/// 3. `.coach` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COACH_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".coach");
    }

    PathBuf::from(".coach")
}

/// Path of the config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load configuration from `path`.
pub async fn load_config(path: &Path) -> Result<CoachConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(CoachConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<CoachConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Resolve the API key through `lookup` (an environment reader).
///
/// Tries `settings.api_key_env` first, then [`FALLBACK_API_KEY_ENV`]. Blank
/// values count as unset.
pub fn resolve_api_key(
    settings: &ProviderSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    [settings.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
        .into_iter()
        .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
        .map(|value| SecretString::from(value.trim().to_string()))
        .ok_or_else(|| ConfigError::MissingApiKey(settings.api_key_env.clone()))
}

/// [`resolve_api_key`] against the process environment.
pub fn resolve_api_key_from_env(settings: &ProviderSettings) -> Result<SecretString, ConfigError> {
    resolve_api_key(settings, |name| std::env::var(name).ok())
}
