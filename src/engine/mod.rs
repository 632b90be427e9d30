//! Dialogue walkthrough engine
//!
//! A walkthrough is a linear state machine over an integer cursor:
//! `next(s, input) = s + 1` when `input` matches the expected reply at `s`,
//! otherwise `s`. The cursor value equal to the number of user steps is
//! terminal and absorbing.

mod service;
mod sink;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use service::WalkthroughService;
pub use sink::{MessageSink, RecordingSink};
pub use transition::{advance, greet, Transition};
