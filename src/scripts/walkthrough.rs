//! Validated, compiled form of a script
//!
//! Compilation groups the agent content around each user step so the engine
//! can answer a transition with a single index lookup. All malformed-script
//! checks happen here, once, at startup.

use crate::utils::errors::{WalkthroughError, Result};
use super::model::{DisplayMessage, MatchPolicy, Script, ScriptStep};

const EXPECTED_PLACEHOLDER: &str = "{expected}";

/// A user step and the agent messages sent once it is matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub expected: String,
    pub replies: Vec<DisplayMessage>,
}

/// An immutable, validated walkthrough shared across all sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walkthrough {
    id: String,
    name: String,
    policy: MatchPolicy,
    reprompt: String,
    opening: Vec<DisplayMessage>,
    gates: Vec<Gate>,
    completion: Vec<DisplayMessage>,
}

impl Walkthrough {
    /// Validate a script and compile it
    pub fn compile(script: Script) -> Result<Self> {
        let Script { id, name, policy, reprompt, completion, steps } = script;

        if id.trim().is_empty() {
            return Err(WalkthroughError::configuration("Script id cannot be empty"));
        }
        if steps.is_empty() {
            return Err(config_error(&id, "script has no steps"));
        }
        if !reprompt.contains(EXPECTED_PLACEHOLDER) {
            return Err(config_error(&id, format!("reprompt must contain {}", EXPECTED_PLACEHOLDER)));
        }

        let mut opening = Vec::new();
        let mut gates: Vec<Gate> = Vec::new();

        for (index, step) in steps.into_iter().enumerate() {
            match step {
                ScriptStep::Agent { content } => {
                    if content.is_empty() {
                        return Err(config_error(&id, format!("agent step {} has no content", index)));
                    }
                    for message in &content {
                        validate_message(&id, &format!("agent step {}", index), message)?;
                    }
                    match gates.last_mut() {
                        Some(gate) => gate.replies.extend(content),
                        None => opening.extend(content),
                    }
                }
                ScriptStep::User { expected } => {
                    if expected.trim().is_empty() {
                        return Err(config_error(&id, format!("user step {} has no expected reply", index)));
                    }
                    // An expected reply that normalizes to nothing would accept an empty message
                    if policy.normalize(&expected).trim().is_empty() {
                        return Err(config_error(
                            &id,
                            format!("user step {} expected reply '{}' is empty after normalization", index, expected),
                        ));
                    }
                    if policy.trim_whitespace && expected.trim() != expected {
                        return Err(config_error(
                            &id,
                            format!("user step {} expected reply has surrounding whitespace", index),
                        ));
                    }
                    gates.push(Gate { expected, replies: Vec::new() });
                }
            }
        }

        if gates.is_empty() {
            return Err(config_error(&id, "script has no user steps"));
        }

        let completion = match completion {
            Some(messages) => {
                if messages.is_empty() {
                    return Err(config_error(&id, "completion cannot be empty"));
                }
                for message in &messages {
                    validate_message(&id, "completion", message)?;
                }
                messages
            }
            None => gates.last().map(|gate| gate.replies.clone()).unwrap_or_default(),
        };
        if completion.is_empty() {
            return Err(config_error(
                &id,
                "no completion message: add an agent step after the last user step or set completion",
            ));
        }

        Ok(Self { id, name, policy, reprompt, opening, gates, completion })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Agent messages before the first user step
    pub fn opening(&self) -> &[DisplayMessage] {
        &self.opening
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, step_index: usize) -> Option<&Gate> {
        self.gates.get(step_index)
    }

    pub fn completion(&self) -> &[DisplayMessage] {
        &self.completion
    }

    pub fn num_user_steps(&self) -> usize {
        self.gates.len()
    }

    pub fn is_complete(&self, step_index: usize) -> bool {
        step_index >= self.gates.len()
    }

    /// Corrective prompt carrying the literal expected reply
    pub fn reprompt_for(&self, expected: &str) -> DisplayMessage {
        DisplayMessage::text(self.reprompt.replace(EXPECTED_PLACEHOLDER, expected))
    }
}

fn config_error(script_id: &str, reason: impl std::fmt::Display) -> WalkthroughError {
    WalkthroughError::configuration(format!("script '{}': {}", script_id, reason))
}

fn validate_message(script_id: &str, location: &str, message: &DisplayMessage) -> Result<()> {
    match message {
        DisplayMessage::Text { text } if text.trim().is_empty() => {
            Err(config_error(script_id, format!("{} has an empty text message", location)))
        }
        DisplayMessage::Markdown { markdown } if markdown.trim().is_empty() => {
            Err(config_error(script_id, format!("{} has an empty markdown message", location)))
        }
        DisplayMessage::Image { url, .. } => match url::Url::parse(url) {
            Ok(_) => Ok(()),
            Err(e) => Err(config_error(script_id, format!("{} has an invalid image URL '{}': {}", location, url, e))),
        },
        _ => Ok(()),
    }
}
