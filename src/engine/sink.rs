//! Output channel for display messages

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::scripts::DisplayMessage;
use crate::utils::errors::Result;

/// Delivers display messages to one session's chat, preserving order
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn emit(&self, messages: &[DisplayMessage]) -> Result<()>;
}

/// Sink that keeps every emitted message in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<DisplayMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages emitted so far
    pub async fn messages(&self) -> Vec<DisplayMessage> {
        self.messages.lock().await.clone()
    }

    /// Drain the recorded messages
    pub async fn take(&self) -> Vec<DisplayMessage> {
        std::mem::take(&mut *self.messages.lock().await)
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn emit(&self, messages: &[DisplayMessage]) -> Result<()> {
        self.messages.lock().await.extend_from_slice(messages);
        Ok(())
    }
}
