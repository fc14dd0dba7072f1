//! Configuration error types

/// Errors that can occur while loading or validating a [`TableConfig`](crate::config::TableConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for a table config.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range.
    #[error("Invalid config field `{field}`: {message}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },
}

impl ConfigError {
    /// Creates a new invalid-field error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}
