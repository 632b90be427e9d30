//! Telegram rendering of display messages

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, ParseMode};
use tracing::debug;

use crate::engine::MessageSink;
use super::markdown::to_telegram_html;
use crate::scripts::DisplayMessage;
use crate::utils::errors::Result;

/// Sends display messages to one Telegram chat, one request at a time
#[derive(Debug, Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send(&self, message: &DisplayMessage) -> Result<()> {
        match message {
            DisplayMessage::Text { text } => {
                self.bot.send_message(self.chat_id, text).await?;
            }
            DisplayMessage::Markdown { markdown } => {
                self.bot
                    .send_message(self.chat_id, to_telegram_html(markdown))
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            DisplayMessage::Image { url, alt } => {
                let photo = InputFile::url(url::Url::parse(url)?);
                let request = self.bot.send_photo(self.chat_id, photo);
                match alt {
                    Some(caption) => request.caption(caption).await?,
                    None => request.await?,
                };
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn emit(&self, messages: &[DisplayMessage]) -> Result<()> {
        for message in messages {
            self.send(message).await?;
        }
        debug!(chat_id = self.chat_id.0, count = messages.len(), "Messages delivered");
        Ok(())
    }
}
