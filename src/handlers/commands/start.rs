//! Start command handler
//!
//! Greets the chat: the script's opening for a new session, or the last
//! agent turn for a session already in progress.

use std::sync::Arc;
use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, info};
use crate::engine::WalkthroughService;
use crate::handlers::{session_id, TelegramSink};
use crate::utils::errors::Result;

/// Handle /start command
pub async fn handle_start(bot: Bot, msg: Message, service: Arc<WalkthroughService>) -> Result<()> {
    let chat_id = msg.chat.id;
    let session_id = session_id(chat_id);

    debug!(session_id = %session_id, "Processing /start command");

    let sink = TelegramSink::new(bot.clone(), chat_id);
    let emitted = service.start(&session_id, &sink).await?;

    if emitted == 0 {
        // Scripts that open with a user step have nothing to say yet
        let hint = format!("{}: send your first message to begin.", service.walkthrough().name());
        bot.send_message(chat_id, hint).await?;
    }

    info!(session_id = %session_id, emitted = emitted, "Session greeted");
    Ok(())
}
