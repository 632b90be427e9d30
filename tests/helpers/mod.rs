//! Test helpers module
//!
//! Builders for walkthrough services backed by in-memory storage, plus a
//! driver that feeds a session a sequence of replies.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use walkthrough_bot::{
    scripts::builtin, DisplayMessage, InMemoryStateStore, RecordingSink, Script, Transition, Walkthrough,
    WalkthroughService,
};

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Service and the store behind it
pub struct TestBot {
    pub service: WalkthroughService,
    pub store: Arc<InMemoryStateStore>,
}

impl TestBot {
    pub fn new(script: Script) -> Self {
        init_test_env();
        let walkthrough = Arc::new(Walkthrough::compile(script).expect("script should compile"));
        let store = Arc::new(InMemoryStateStore::new());
        let service = WalkthroughService::new(walkthrough, store.clone());
        Self { service, store }
    }

    pub fn travel_booking() -> Self {
        Self::new(builtin::travel_booking())
    }

    pub fn todo_list() -> Self {
        Self::new(builtin::todo_list())
    }

    /// Send one reply and return the transition with the messages it emitted
    pub async fn reply(&self, session_id: &str, text: &str) -> (Transition, Vec<DisplayMessage>) {
        let sink = RecordingSink::new();
        let transition = self
            .service
            .handle_message(session_id, text, &sink)
            .await
            .expect("handle_message should succeed");
        (transition, sink.take().await)
    }

    pub async fn step(&self, session_id: &str) -> usize {
        self.service.state(session_id).await.expect("state should load").step_index
    }
}

/// Plain text body of every message
pub fn texts(messages: &[DisplayMessage]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| m.body().map(str::to_string))
        .collect()
}
