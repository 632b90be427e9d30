//! Walkthrough Bot
//!
//! A Telegram bot that replays scripted, reply-gated conversations.
//! This library provides the script model, the walkthrough engine with
//! per-session state storage, and the Telegram host around it.

pub mod config;
pub mod engine;
pub mod handlers;
pub mod scripts;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{WalkthroughError, Result};

// Re-export main components for easy access
pub use engine::{MessageSink, RecordingSink, Transition, WalkthroughService};
pub use scripts::{DisplayMessage, Script, ScriptRegistry, ScriptStep, Walkthrough};
pub use state::{ConversationState, InMemoryStateStore, RedisStateStore, StateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
