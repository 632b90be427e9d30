//! Help command handler

use std::sync::Arc;
use teloxide::{Bot, types::Message, prelude::*, utils::command::BotCommands};
use crate::engine::WalkthroughService;
use crate::utils::errors::Result;
use super::Command;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message, service: Arc<WalkthroughService>) -> Result<()> {
    bot.send_message(msg.chat.id, help_text(service.walkthrough().name())).await?;
    Ok(())
}

fn help_text(script_name: &str) -> String {
    format!(
        "🤖 {} walkthrough\n\n{}\n\nReply with the text shown in each prompt to continue.",
        script_name,
        Command::descriptions()
    )
}
