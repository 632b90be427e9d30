//! Property-based tests for the walkthrough state machine
//!
//! These tests verify key invariants hold across arbitrary inputs.

use super::transition::*;
use crate::scripts::{builtin, MatchPolicy, Walkthrough};
use crate::state::ConversationState;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn travel() -> Walkthrough {
    Walkthrough::compile(builtin::travel_booking()).unwrap()
}

fn todo() -> Walkthrough {
    Walkthrough::compile(builtin::todo_list()).unwrap()
}

fn state_at(walkthrough: &Walkthrough, step_index: usize) -> ConversationState {
    let mut state = ConversationState::new(walkthrough.id());
    state.advance_to(step_index);
    state
}

/// Drive a walkthrough through a sequence of inputs, checking each step
fn run(walkthrough: &Walkthrough, inputs: &[String]) -> usize {
    let mut state = ConversationState::new(walkthrough.id());
    for input in inputs {
        let before = state.step_index;
        let outcome = advance(walkthrough, &state, input);
        let after = outcome.next_step(before);
        assert!(after == before || after == before + 1);
        assert!(after <= walkthrough.num_user_steps());
        state.advance_to(after);
    }
    state.step_index
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Mix of the script's real replies, near misses and noise
fn arb_input(walkthrough: &Walkthrough) -> impl Strategy<Value = String> {
    let expected: Vec<String> = walkthrough.gates().iter().map(|g| g.expected.clone()).collect();
    let near: Vec<String> = expected.iter().map(|e| format!("{}.", e)).collect();
    prop_oneof![
        proptest::sample::select(expected),
        proptest::sample::select(near),
        "[a-zA-Z ]{0,20}",
        Just(String::new()),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn cursor_moves_at_most_one_step(inputs in proptest::collection::vec(arb_input(&travel()), 0..40)) {
        let walkthrough = travel();
        let end = run(&walkthrough, &inputs);
        prop_assert!(end <= walkthrough.num_user_steps());
    }

    #[test]
    fn terminal_state_absorbs_any_input(input in ".*") {
        let walkthrough = travel();
        let done = state_at(&walkthrough, walkthrough.num_user_steps());
        let outcome = advance(&walkthrough, &done, &input);
        prop_assert_eq!(outcome, Transition::Completed { messages: walkthrough.completion().to_vec() });
    }

    #[test]
    fn mismatch_keeps_cursor_and_names_expected(step in 0usize..6, input in "[a-z]{1,12}") {
        let walkthrough = travel();
        let expected = walkthrough.gate(step).unwrap().expected.clone();
        prop_assume!(input != expected);

        let outcome = advance(&walkthrough, &state_at(&walkthrough, step), &input);
        prop_assert_eq!(outcome.next_step(step), step);
        let body = outcome.messages()[0].body().unwrap().to_string();
        prop_assert!(body.contains(&expected));
    }

    #[test]
    fn exact_reply_always_advances(step in 0usize..8, padding in "[ \t]{0,3}") {
        let walkthrough = todo();
        let expected = walkthrough.gate(step).unwrap().expected.clone();
        let input = format!("{}{}{}", padding, expected.to_uppercase(), padding);

        let outcome = advance(&walkthrough, &state_at(&walkthrough, step), &input);
        prop_assert_eq!(outcome.next_step(step), step + 1);
        prop_assert_eq!(outcome.messages(), walkthrough.gate(step).unwrap().replies.as_slice());
    }

    #[test]
    fn normalization_is_idempotent(input in "[a-zA-Z .!?,;:\t]{0,30}", case_sensitive in any::<bool>(), punct in any::<bool>()) {
        let policy = MatchPolicy { trim_whitespace: true, case_sensitive, ignore_trailing_punctuation: punct };
        let once = policy.normalize(&input).into_owned();
        let twice = policy.normalize(&once).into_owned();
        prop_assert_eq!(once, twice);
    }
}
