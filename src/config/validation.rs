//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{WalkthroughError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_walkthrough_config(&settings.walkthrough)?;
    validate_logging_config(&settings.logging)?;

    if settings.storage.backend == StorageBackend::Redis {
        validate_redis_config(&settings.redis)?;
    }

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(WalkthroughError::configuration("Bot token is required"));
    }

    Ok(())
}

/// Validate walkthrough selection
fn validate_walkthrough_config(config: &super::WalkthroughConfig) -> Result<()> {
    if config.script.trim().is_empty() {
        return Err(WalkthroughError::configuration("Active script id is required"));
    }

    if config.script_files.iter().any(|path| path.trim().is_empty()) {
        return Err(WalkthroughError::configuration("Script file paths cannot be empty"));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(WalkthroughError::configuration("Redis URL is required"));
    }

    if config.ttl_seconds == 0 {
        return Err(WalkthroughError::configuration("Redis TTL must be greater than 0"));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(WalkthroughError::configuration("Log level is required"));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(WalkthroughError::configuration(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.file_path.is_empty() {
        return Err(WalkthroughError::configuration("Log directory is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123:abc".to_string();
        settings
    }

    #[test]
    fn test_default_settings_with_token_are_valid() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_token_rejected() {
        let settings = Settings::default();
        assert_matches!(validate_settings(&settings), Err(WalkthroughError::Configuration(_)));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "loud".to_string();
        assert_matches!(validate_settings(&settings), Err(WalkthroughError::Configuration(msg)) if msg.contains("loud"));
    }

    #[test]
    fn test_redis_checked_only_when_selected() {
        let mut settings = valid_settings();
        settings.redis.ttl_seconds = 0;
        assert!(validate_settings(&settings).is_ok());

        settings.storage.backend = StorageBackend::Redis;
        assert_matches!(validate_settings(&settings), Err(WalkthroughError::Configuration(_)));
    }
}
