//! Pure walkthrough transitions
//!
//! Given a walkthrough, the current cursor and the user's reply, decide what
//! the bot says and where the cursor goes. No I/O happens here.

use crate::scripts::{DisplayMessage, Walkthrough};
use crate::state::ConversationState;

/// Outcome of feeding one user message to a walkthrough
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The reply matched; the cursor moves from `from` to `to` (= `from + 1`)
    Advanced {
        from: usize,
        to: usize,
        messages: Vec<DisplayMessage>,
    },
    /// The reply did not match; the cursor stays at `step_index`
    Reprompt {
        step_index: usize,
        message: DisplayMessage,
    },
    /// The walkthrough was already complete
    Completed { messages: Vec<DisplayMessage> },
}

impl Transition {
    /// Messages to emit, in order
    pub fn messages(&self) -> &[DisplayMessage] {
        match self {
            Transition::Advanced { messages, .. } => messages,
            Transition::Reprompt { message, .. } => std::slice::from_ref(message),
            Transition::Completed { messages } => messages,
        }
    }

    /// Cursor after the transition, given the cursor before it
    pub fn next_step(&self, current: usize) -> usize {
        match self {
            Transition::Advanced { to, .. } => *to,
            _ => current,
        }
    }

    pub fn is_advance(&self) -> bool {
        matches!(self, Transition::Advanced { .. })
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            Transition::Advanced { .. } => "advanced",
            Transition::Reprompt { .. } => "reprompt",
            Transition::Completed { .. } => "completed",
        }
    }
}

/// Feed a user message to the walkthrough at the state's cursor
pub fn advance(walkthrough: &Walkthrough, state: &ConversationState, user_message: &str) -> Transition {
    let step_index = state.step_index;

    let Some(gate) = walkthrough.gate(step_index) else {
        return Transition::Completed {
            messages: walkthrough.completion().to_vec(),
        };
    };

    if walkthrough.policy().matches(user_message, &gate.expected) {
        Transition::Advanced {
            from: step_index,
            to: step_index + 1,
            messages: gate.replies.clone(),
        }
    } else {
        Transition::Reprompt {
            step_index,
            message: walkthrough.reprompt_for(&gate.expected),
        }
    }
}

/// Messages for a session that (re)opens the chat, without consuming input
///
/// At the start this is the opening; mid-walkthrough it repeats the last
/// agent turn so the user sees what is expected; once complete it is the
/// completion message.
pub fn greet(walkthrough: &Walkthrough, state: &ConversationState) -> Vec<DisplayMessage> {
    let step_index = state.step_index;

    if walkthrough.is_complete(step_index) {
        return walkthrough.completion().to_vec();
    }
    if step_index == 0 {
        return walkthrough.opening().to_vec();
    }

    match walkthrough.gate(step_index - 1) {
        Some(previous) if !previous.replies.is_empty() => previous.replies.clone(),
        _ => walkthrough
            .gate(step_index)
            .map(|gate| vec![walkthrough.reprompt_for(&gate.expected)])
            .unwrap_or_default(),
    }
}
