//! Command handlers module
//!
//! This module contains handlers for the bot commands /start and /help.

pub mod start;
pub mod help;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::engine::WalkthroughService;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Walkthrough commands:")]
pub enum Command {
    #[command(description = "Start or resume the walkthrough")]
    Start,
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: Arc<WalkthroughService>,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, service).await,
        Command::Help => help::handle_help(bot, msg, service).await,
    }
}
