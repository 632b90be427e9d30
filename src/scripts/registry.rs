//! Script registry
//!
//! Holds every compiled walkthrough the process knows about, keyed by id.
//! Built once at startup and read-only afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::utils::errors::{WalkthroughError, Result};
use crate::utils::logging;
use super::builtin;
use super::model::Script;
use super::walkthrough::Walkthrough;

#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Arc<Walkthrough>>,
}

impl ScriptRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing the built-in scripts
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for script in builtin::all() {
            registry.register_from(script, "builtin")?;
        }
        Ok(registry)
    }

    /// Compile and register a script
    pub fn register(&mut self, script: Script) -> Result<Arc<Walkthrough>> {
        self.register_from(script, "code")
    }

    /// Load, compile and register a TOML script file
    pub async fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<Walkthrough>> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path).await?;
        let script = Script::from_toml(&source)?;
        self.register_from(script, &path.display().to_string())
    }

    fn register_from(&mut self, script: Script, source: &str) -> Result<Arc<Walkthrough>> {
        if self.scripts.contains_key(&script.id) {
            return Err(WalkthroughError::configuration(format!(
                "Duplicate script id '{}' (from {})",
                script.id, source
            )));
        }

        let walkthrough = Arc::new(Walkthrough::compile(script)?);
        logging::log_script_loaded(walkthrough.id(), walkthrough.num_user_steps(), source);
        self.scripts.insert(walkthrough.id().to_string(), walkthrough.clone());
        Ok(walkthrough)
    }

    /// Get a walkthrough by id
    pub fn get(&self, id: &str) -> Option<Arc<Walkthrough>> {
        self.scripts.get(id).cloned()
    }

    /// Get a walkthrough by id, failing with a configuration error when absent
    pub fn require(&self, id: &str) -> Result<Arc<Walkthrough>> {
        self.get(id).ok_or_else(|| {
            let mut known: Vec<&str> = self.ids();
            known.sort_unstable();
            WalkthroughError::configuration(format!("Unknown script '{}'. Available: {}", id, known.join(", ")))
        })
    }

    /// Ids of all registered scripts
    pub fn ids(&self) -> Vec<&str> {
        self.scripts.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
