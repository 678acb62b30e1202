//! Errors raised while loading or validating settings

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required TOML file is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Sources were read but do not deserialize into `Settings`
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A value is outside its accepted range or format
    #[error("Invalid setting {field}: {message}")]
    ValidationError { field: String, message: String },

    /// An environment variable holds an unusable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Directory and single-file modes were both requested
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }

    /// Dotted settings key the error refers to, or `"settings"` when the
    /// failure is not tied to one key.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::ValidationError { field, .. } => field,
            _ => "settings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_its_key() {
        let err = ConfigError::validation("server.port", "Port must be between 1 and 65535.");
        assert_eq!(err.key(), "server.port");
        assert_eq!(
            err.to_string(),
            "Invalid setting server.port: Port must be between 1 and 65535."
        );
    }

    #[test]
    fn test_other_errors_use_generic_key() {
        assert_eq!(ConfigError::file_not_found("config/default.toml").key(), "settings");
        assert_eq!(ConfigError::mutual_exclusivity("both set").key(), "settings");
    }
}
