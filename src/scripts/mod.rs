//! Walkthrough scripts
//!
//! This module defines the script data model, compiles scripts into
//! validated walkthroughs, and ships the built-in scripts.

pub mod builtin;
pub mod model;
pub mod registry;
pub mod walkthrough;

pub use model::{DisplayMessage, MatchPolicy, Script, ScriptStep, Speaker};
pub use registry::ScriptRegistry;
pub use walkthrough::{Gate, Walkthrough};
