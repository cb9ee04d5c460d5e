use thiserror::Error;

/// Errors raised while building an interview configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("role must not be empty")]
    EmptyRole,

    #[error("invalid interview round: {0}")]
    InvalidRound(String),

    #[error("invalid experience level: {0}")]
    InvalidLevel(String),
}

/// Errors from loading the coach config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::InvalidRound("lunch".to_string());
        assert_eq!(err.to_string(), "invalid interview round: lunch");
    }

    #[test]
    fn test_missing_api_key_display() {
        let err = ConfigError::MissingApiKey("GEMINI_API_KEY".to_string());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
