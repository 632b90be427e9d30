//! Bot handlers module
//!
//! This module contains the Telegram host for the walkthrough engine:
//! - Command handlers for bot commands
//! - Message handlers for free-text replies
//! - The sink that renders display messages into Telegram messages

pub mod commands;
pub mod markdown;
pub mod messages;
pub mod sink;

use teloxide::types::ChatId;

// Re-export commonly used handler functions
pub use commands::{handle_command, Command};
pub use messages::handle_message;
pub use sink::TelegramSink;

/// Session id for a Telegram chat
pub fn session_id(chat_id: ChatId) -> String {
    format!("tg:{}", chat_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_per_chat() {
        assert_eq!(session_id(ChatId(42)), "tg:42");
        assert_eq!(session_id(ChatId(-1001234567890)), "tg:-1001234567890");
        assert_ne!(session_id(ChatId(1)), session_id(ChatId(2)));
    }
}
