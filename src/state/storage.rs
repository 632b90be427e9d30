//! State storage implementation
//!
//! This module handles persistence of conversation state, either in process
//! memory or in Redis with serialization and expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::context::ConversationState;

/// Host-provided persistence for per-session walkthrough state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state for a session, `None` if the session was never advanced
    async fn get_state(&self, session_id: &str) -> Result<Option<ConversationState>>;

    /// Persist the state for a session
    async fn set_state(&self, session_id: &str, state: &ConversationState) -> Result<()>;
}

/// Process-local state storage
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with persisted state
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get_state(&self, session_id: &str) -> Result<Option<ConversationState>> {
        Ok(self.states.read().await.get(session_id).cloned())
    }

    async fn set_state(&self, session_id: &str, state: &ConversationState) -> Result<()> {
        self.states.write().await.insert(session_id.to_string(), state.clone());
        Ok(())
    }
}

/// Redis-based state storage
#[derive(Clone)]
pub struct RedisStateStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisStateStore {
    /// Create a new Redis state store
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn state_key(&self, session_id: &str) -> String {
        state_key(&self.config.prefix, session_id)
    }
}

/// Redis key holding a session's state: `<prefix>state:<session_id>`
fn state_key(prefix: &str, session_id: &str) -> String {
    format!("{}state:{}", prefix, session_id)
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get_state(&self, session_id: &str) -> Result<Option<ConversationState>> {
        let key = self.state_key(session_id);
        debug!(session_id = session_id, key = %key, "Loading state from Redis");

        let mut conn = self.connection_manager.clone();
        let serialized: Option<String> = match conn.get::<_, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(session_id = session_id, error = %e, "Failed to get state from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                let state: ConversationState = match serde_json::from_str(&data) {
                    Ok(state) => state,
                    Err(e) => {
                        error!(session_id = session_id, error = %e, "Failed to deserialize state");
                        return Err(e.into());
                    }
                };
                debug!(session_id = session_id, step_index = state.step_index, "State loaded");
                Ok(Some(state))
            }
            None => {
                debug!(session_id = session_id, "No state found in Redis");
                Ok(None)
            }
        }
    }

    async fn set_state(&self, session_id: &str, state: &ConversationState) -> Result<()> {
        let key = self.state_key(session_id);
        let serialized = serde_json::to_string(state)?;

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, self.config.ttl_seconds).await {
            Ok(_) => {
                debug!(session_id = session_id, step_index = state.step_index,
                       ttl_seconds = self.config.ttl_seconds, "State saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(session_id = session_id, error = %e, "Failed to save state to Redis");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for RedisStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStateStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
