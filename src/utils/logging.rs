//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the walkthrough bot.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{WalkthroughError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop, so keep it alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "walkthrough-bot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| WalkthroughError::configuration(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_json = config.json.then(|| {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout)
    });
    let stdout_plain = (!config.json).then(|| {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_json)
        .with(stdout_plain)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| WalkthroughError::configuration(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a walkthrough transition with structured data
pub fn log_transition(session_id: &str, script_id: &str, from_step: usize, outcome: &str, to_step: usize) {
    info!(
        session_id = session_id,
        script_id = script_id,
        from_step = from_step,
        to_step = to_step,
        outcome = outcome,
        "Walkthrough transition"
    );
}

/// Log a script that passed validation
pub fn log_script_loaded(script_id: &str, user_steps: usize, source: &str) {
    info!(
        script_id = script_id,
        user_steps = user_steps,
        source = source,
        "Script loaded"
    );
}

/// Log a persisted state that could not be used
pub fn log_rejected_state(session_id: &str, reason: &str) {
    warn!(
        session_id = session_id,
        reason = reason,
        "Persisted conversation state rejected"
    );
}

/// Log delivery of display messages to a session
pub fn log_emit(session_id: &str, count: usize) {
    debug!(session_id = session_id, count = count, "Emitting display messages");
}
