//! Conversation state
//!
//! Tracks how far a single session has progressed through a walkthrough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scripts::Walkthrough;
use crate::utils::errors::{WalkthroughError, Result};

/// Per-session walkthrough progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Script this cursor belongs to
    pub script_id: String,
    /// Number of user steps matched so far
    pub step_index: usize,
    /// When the cursor last moved
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Fresh state at the start of a walkthrough
    pub fn new(script_id: impl Into<String>) -> Self {
        Self {
            script_id: script_id.into(),
            step_index: 0,
            updated_at: Utc::now(),
        }
    }

    /// Move the cursor to `step_index`
    pub fn advance_to(&mut self, step_index: usize) {
        self.step_index = step_index;
        self.updated_at = Utc::now();
    }

    /// Whether the walkthrough has reached its terminal step
    pub fn is_complete(&self, walkthrough: &Walkthrough) -> bool {
        walkthrough.is_complete(self.step_index)
    }

    /// Check a loaded state against the walkthrough it is about to drive
    pub fn validate_for(&self, session_id: &str, walkthrough: &Walkthrough) -> Result<()> {
        if self.script_id != walkthrough.id() {
            return Err(WalkthroughError::InvalidState {
                session_id: session_id.to_string(),
                reason: format!(
                    "state belongs to script '{}', active script is '{}'",
                    self.script_id,
                    walkthrough.id()
                ),
            });
        }

        if self.step_index > walkthrough.num_user_steps() {
            return Err(WalkthroughError::InvalidState {
                session_id: session_id.to_string(),
                reason: format!(
                    "step index {} exceeds {} user steps",
                    self.step_index,
                    walkthrough.num_user_steps()
                ),
            });
        }

        Ok(())
    }
}
