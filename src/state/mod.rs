//! State management module
//!
//! This module handles per-session walkthrough state and its storage

pub mod context;
pub mod storage;

pub use context::ConversationState;
pub use storage::{InMemoryStateStore, RedisStateStore, StateStore};
