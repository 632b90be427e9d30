//! Script data model
//!
//! A script is the hand-authored, ordered list of agent and user turns a
//! walkthrough replays. These types mirror the TOML layout of script files.

use std::borrow::Cow;
use serde::{Deserialize, Serialize};

/// Who speaks in a script step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    User,
}

/// A single output unit delivered to the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayMessage {
    /// Plain text
    Text { text: String },
    /// Formatted text, rendered by the host
    Markdown { markdown: String },
    /// Image by URL with optional alt text
    Image {
        url: String,
        #[serde(default)]
        alt: Option<String>,
    },
}

impl DisplayMessage {
    pub fn text(text: impl Into<String>) -> Self {
        DisplayMessage::Text { text: text.into() }
    }

    pub fn markdown(markdown: impl Into<String>) -> Self {
        DisplayMessage::Markdown { markdown: markdown.into() }
    }

    pub fn image(url: impl Into<String>, alt: Option<String>) -> Self {
        DisplayMessage::Image { url: url.into(), alt }
    }

    /// Textual body of the message, if it carries one
    pub fn body(&self) -> Option<&str> {
        match self {
            DisplayMessage::Text { text } => Some(text),
            DisplayMessage::Markdown { markdown } => Some(markdown),
            DisplayMessage::Image { alt, .. } => alt.as_deref(),
        }
    }
}

/// One entry in a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "speaker", rename_all = "lowercase")]
pub enum ScriptStep {
    /// Messages the bot sends
    Agent { content: Vec<DisplayMessage> },
    /// The exact reply the user must type to continue
    User { expected: String },
}

impl ScriptStep {
    pub fn agent(content: Vec<DisplayMessage>) -> Self {
        ScriptStep::Agent { content }
    }

    /// Agent step with a single plain text message
    pub fn say(text: impl Into<String>) -> Self {
        ScriptStep::Agent { content: vec![DisplayMessage::text(text)] }
    }

    pub fn expect(expected: impl Into<String>) -> Self {
        ScriptStep::User { expected: expected.into() }
    }

    pub fn speaker(&self) -> Speaker {
        match self {
            ScriptStep::Agent { .. } => Speaker::Agent,
            ScriptStep::User { .. } => Speaker::User,
        }
    }
}

const TRAILING_PUNCTUATION: &[char] = &['.', '!', '?', ',', ';', ':'];

/// How a user reply is compared with the expected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Strip surrounding whitespace before comparing
    pub trim_whitespace: bool,
    /// When false, both sides are lowercased
    pub case_sensitive: bool,
    /// Strip trailing `.!?,;:` from the reply
    pub ignore_trailing_punctuation: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            case_sensitive: true,
            ignore_trailing_punctuation: false,
        }
    }
}

impl MatchPolicy {
    /// Case-insensitive variant of the default policy
    pub fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
            ..Self::default()
        }
    }

    /// Normalize a string according to this policy
    pub fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut value = input;
        if self.trim_whitespace {
            value = value.trim();
        }
        if self.ignore_trailing_punctuation {
            let trim = self.trim_whitespace;
            value = value.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || (trim && c.is_whitespace()));
        }
        if self.case_sensitive {
            Cow::Borrowed(value)
        } else {
            Cow::Owned(value.to_lowercase())
        }
    }

    /// Whether `input` is accepted as `expected`
    pub fn matches(&self, input: &str, expected: &str) -> bool {
        self.normalize(input) == self.normalize(expected)
    }
}

fn default_reprompt() -> String {
    "Please type exactly: {expected}".to_string()
}

/// A script definition as authored in code or in a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub policy: MatchPolicy,
    /// Corrective prompt; `{expected}` is replaced with the expected reply
    #[serde(default = "default_reprompt")]
    pub reprompt: String,
    /// Returned for every message once the walkthrough is complete.
    /// Defaults to the agent content after the last user step.
    #[serde(default)]
    pub completion: Option<Vec<DisplayMessage>>,
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new(id: impl Into<String>, name: impl Into<String>, steps: Vec<ScriptStep>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            policy: MatchPolicy::default(),
            reprompt: default_reprompt(),
            completion: None,
            steps,
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_reprompt(mut self, reprompt: impl Into<String>) -> Self {
        self.reprompt = reprompt.into();
        self
    }

    pub fn with_completion(mut self, completion: Vec<DisplayMessage>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Parse a script from TOML text
    pub fn from_toml(source: &str) -> crate::Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
