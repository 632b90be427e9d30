//! Walkthrough service
//!
//! Drives one walkthrough for many sessions. Every read-advance-write cycle
//! for a session runs under that session's lock, so two near-simultaneous
//! replies cannot both advance from the same cursor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument, warn};

use crate::scripts::Walkthrough;
use crate::state::{ConversationState, StateStore};
use crate::utils::errors::Result;
use crate::utils::logging;
use super::sink::MessageSink;
use super::transition::{self, Transition};

/// One async mutex per session id with a call in flight
#[derive(Debug, Default)]
struct SessionLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, session_id: &str) -> SessionGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(session_id.to_string()).or_default().clone()
        };
        SessionGuard {
            locks: self,
            session_id: session_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Drop the entry once nobody else holds or waits on it
    fn release(&self, session_id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks.get(session_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(session_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// Holds a session lock; prunes the lock table on drop
struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex first so its Arc no longer counts as a holder
        self.guard.take();
        self.locks.release(&self.session_id);
    }
}

/// Runs a walkthrough against a state store
#[derive(Clone)]
pub struct WalkthroughService {
    walkthrough: Arc<Walkthrough>,
    store: Arc<dyn StateStore>,
    locks: Arc<SessionLocks>,
}

impl WalkthroughService {
    pub fn new(walkthrough: Arc<Walkthrough>, store: Arc<dyn StateStore>) -> Self {
        Self {
            walkthrough,
            store,
            locks: Arc::new(SessionLocks::default()),
        }
    }

    pub fn walkthrough(&self) -> &Walkthrough {
        &self.walkthrough
    }

    /// Current state of a session, defaulting to the start for unseen sessions
    pub async fn state(&self, session_id: &str) -> Result<ConversationState> {
        let _guard = self.locks.acquire(session_id).await;
        self.load(session_id).await
    }

    /// Greet a session without consuming input, returning how many messages were emitted
    #[instrument(skip(self, sink), fields(script_id = %self.walkthrough.id()))]
    pub async fn start(&self, session_id: &str, sink: &dyn MessageSink) -> Result<usize> {
        let _guard = self.locks.acquire(session_id).await;
        let state = self.load(session_id).await?;

        let messages = transition::greet(&self.walkthrough, &state);
        debug!(session_id = session_id, step_index = state.step_index, "Greeting session");
        logging::log_emit(session_id, messages.len());
        sink.emit(&messages).await?;
        Ok(messages.len())
    }

    /// Feed one user message to a session and emit the response
    #[instrument(skip(self, text, sink), fields(script_id = %self.walkthrough.id()))]
    pub async fn handle_message(&self, session_id: &str, text: &str, sink: &dyn MessageSink) -> Result<Transition> {
        let _guard = self.locks.acquire(session_id).await;
        let mut state = self.load(session_id).await?;
        let from = state.step_index;

        let outcome = transition::advance(&self.walkthrough, &state, text);
        let to = outcome.next_step(from);

        // The cursor only moves once the user has been sent the next prompt
        logging::log_emit(session_id, outcome.messages().len());
        if let Err(e) = sink.emit(outcome.messages()).await {
            warn!(session_id = session_id, step_index = from, error = %e, "Delivery failed, cursor not moved");
            return Err(e);
        }

        if outcome.is_advance() {
            state.advance_to(to);
            self.store.set_state(session_id, &state).await?;
        }

        logging::log_transition(session_id, self.walkthrough.id(), from, outcome.label(), to);
        Ok(outcome)
    }

    async fn load(&self, session_id: &str) -> Result<ConversationState> {
        match self.store.get_state(session_id).await? {
            Some(state) => {
                if let Err(e) = state.validate_for(session_id, &self.walkthrough) {
                    logging::log_rejected_state(session_id, &e.to_string());
                    return Err(e);
                }
                Ok(state)
            }
            None => Ok(ConversationState::new(self.walkthrough.id())),
        }
    }
}

impl std::fmt::Debug for WalkthroughService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkthroughService")
            .field("script_id", &self.walkthrough.id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use crate::engine::RecordingSink;
    use crate::scripts::{builtin, DisplayMessage};
    use crate::state::InMemoryStateStore;
    use crate::utils::errors::WalkthroughError;

    /// Counts writes on top of an in-memory store
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryStateStore,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl StateStore for CountingStore {
        async fn get_state(&self, session_id: &str) -> Result<Option<ConversationState>> {
            self.inner.get_state(session_id).await
        }

        async fn set_state(&self, session_id: &str, state: &ConversationState) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_state(session_id, state).await
        }
    }

    /// Sink whose transport is always down
    struct FailingSink;

    #[async_trait]
    impl MessageSink for FailingSink {
        async fn emit(&self, _messages: &[DisplayMessage]) -> Result<()> {
            Err(WalkthroughError::configuration("chat unreachable"))
        }
    }

    fn travel_service() -> (WalkthroughService, Arc<CountingStore>) {
        let walkthrough = Arc::new(Walkthrough::compile(builtin::travel_booking()).unwrap());
        let store = Arc::new(CountingStore::default());
        (WalkthroughService::new(walkthrough, store.clone()), store)
    }

    #[tokio::test]
    async fn test_start_emits_opening_without_persisting() {
        let (service, store) = travel_service();
        let sink = RecordingSink::new();

        assert_eq!(service.start("s1", &sink).await.unwrap(), 1);

        assert_eq!(
            sink.take().await,
            vec![DisplayMessage::text("Hi Ash! Ready to plan a trip?\n\n(Please reply: Flights)")]
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(service.state("s1").await.unwrap().step_index, 0);
    }

    #[tokio::test]
    async fn test_writes_once_per_advance_and_never_on_mismatch() {
        let (service, store) = travel_service();
        let sink = RecordingSink::new();

        service.handle_message("s1", "nope", &sink).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);

        service.handle_message("s1", "Flights", &sink).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        service.handle_message("s1", "Flights", &sink).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(service.state("s1").await.unwrap().step_index, 1);
    }

    #[tokio::test]
    async fn test_concurrent_correct_replies_advance_once() {
        let (service, store) = travel_service();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let sink = RecordingSink::new();
                service.handle_message("race", "Flights", &sink).await.unwrap()
            }));
        }

        let mut advances = 0;
        for handle in handles {
            if handle.await.unwrap().is_advance() {
                advances += 1;
            }
        }

        assert_eq!(advances, 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(service.state("race").await.unwrap().step_index, 1);
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_cursor() {
        let (service, store) = travel_service();

        let result = service.handle_message("s1", "Flights", &FailingSink).await;
        assert!(result.is_err());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(service.state("s1").await.unwrap().step_index, 0);

        // Resending the same reply once delivery works advances as usual
        let sink = RecordingSink::new();
        let outcome = service.handle_message("s1", "Flights", &sink).await.unwrap();
        assert!(outcome.is_advance());
        assert_eq!(
            sink.take().await,
            vec![DisplayMessage::text("Great. Where are you flying from and to?\n\n(Please reply: From JFK to LAX)")]
        );
        assert_eq!(service.state("s1").await.unwrap().step_index, 1);
    }

    #[tokio::test]
    async fn test_lock_table_empty_after_calls_finish() {
        let (service, _store) = travel_service();
        let sink = RecordingSink::new();

        for session in ["a", "b", "c"] {
            service.start(session, &sink).await.unwrap();
            service.handle_message(session, "Flights", &sink).await.unwrap();
        }
        assert_eq!(service.locks.len(), 0);

        let mut handles = Vec::new();
        for i in 0..32 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let sink = RecordingSink::new();
                let session = format!("s{}", i % 4);
                service.handle_message(&session, "Flights", &sink).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(service.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_interleaved_sessions_are_isolated() {
        let (service, _store) = travel_service();
        let replies = [
            "Flights",
            "From JFK to LAX",
            "Jul 12 – Jul 16",
            "JetBlue",
            "No, just flight",
            "Confirm",
        ];

        let finisher = {
            let service = service.clone();
            tokio::spawn(async move {
                let sink = RecordingSink::new();
                for reply in replies {
                    service.handle_message("finisher", reply, &sink).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };
        let wanderer = {
            let service = service.clone();
            tokio::spawn(async move {
                let sink = RecordingSink::new();
                for reply in ["Flights", "Confirm", "flights", "From JFK to LAX", "nope", "Confirm"] {
                    service.handle_message("wanderer", reply, &sink).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };
        finisher.await.unwrap();
        wanderer.await.unwrap();

        assert_eq!(service.state("finisher").await.unwrap().step_index, 6);
        assert_eq!(service.state("wanderer").await.unwrap().step_index, 2);
    }

    #[tokio::test]
    async fn test_state_for_other_script_rejected() {
        let (service, store) = travel_service();
        store.inner.set_state("s1", &ConversationState::new("todo_list")).await.unwrap();

        let sink = RecordingSink::new();
        let result = service.handle_message("s1", "Flights", &sink).await;
        assert_matches!(result, Err(WalkthroughError::InvalidState { .. }));
        assert!(sink.messages().await.is_empty());
    }
}
