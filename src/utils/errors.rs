//! Error handling for the walkthrough bot
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the walkthrough bot
#[derive(Error, Debug)]
pub enum WalkthroughError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Settings error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Script file parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid state for session {session_id}: {reason}")]
    InvalidState { session_id: String, reason: String },

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for walkthrough operations
pub type Result<T> = std::result::Result<T, WalkthroughError>;

impl WalkthroughError {
    /// Shorthand for a startup configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        WalkthroughError::Configuration(message.into())
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            WalkthroughError::Configuration(_) => false,
            WalkthroughError::Config(_) => false,
            WalkthroughError::TomlParse(_) => false,
            WalkthroughError::InvalidState { .. } => false,
            WalkthroughError::Telegram(_) => true,
            WalkthroughError::Redis(_) => true,
            WalkthroughError::Serialization(_) => false,
            WalkthroughError::Io(_) => true,
            WalkthroughError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WalkthroughError::Configuration(_) => ErrorSeverity::Critical,
            WalkthroughError::Config(_) => ErrorSeverity::Critical,
            WalkthroughError::TomlParse(_) => ErrorSeverity::Critical,
            WalkthroughError::InvalidState { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_fatal() {
        let err = WalkthroughError::configuration("script has no steps");
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "Configuration error: script has no steps");
    }

    #[test]
    fn test_invalid_state_message() {
        let err = WalkthroughError::InvalidState {
            session_id: "tg:42".to_string(),
            reason: "cursor out of range".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.to_string().contains("tg:42"));
    }
}
