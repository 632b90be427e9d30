//! Message handlers module
//!
//! Every non-command message is a reply to the walkthrough.

use std::sync::Arc;
use teloxide::{Bot, types::Message};
use tracing::debug;
use crate::engine::WalkthroughService;
use crate::handlers::{session_id, TelegramSink};
use crate::utils::errors::Result;

/// Handle an incoming message as a walkthrough reply
pub async fn handle_message(bot: Bot, msg: Message, service: Arc<WalkthroughService>) -> Result<()> {
    let chat_id = msg.chat.id;
    let session_id = session_id(chat_id);
    // Stickers, photos and the like count as an empty reply
    let text = msg.text().unwrap_or_default();

    debug!(session_id = %session_id, has_text = msg.text().is_some(), "Processing message");

    let sink = TelegramSink::new(bot, chat_id);
    service.handle_message(&session_id, text, &sink).await?;
    Ok(())
}
