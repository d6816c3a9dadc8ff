//! Error types and handling for us-address-parser.

/// Result type alias for address parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for address parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single record could not be parsed
    #[error("Parse error: {message}")]
    ParseError {
        /// Error message
        message: String,
    },

    /// Configuration is invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// A pattern built from configuration or input failed to compile
    #[error("Pattern error: {source}")]
    PatternError {
        /// Source error
        #[from]
        source: regex::Error,
    },

    /// I/O errors (configuration files)
    #[error("I/O error: {source}")]
    IoError {
        /// Source error
        #[from]
        source: std::io::Error,
    },

    /// JSON configuration errors
    #[cfg(feature = "serde")]
    #[error("JSON error: {source}")]
    JsonError {
        /// Source error
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}
