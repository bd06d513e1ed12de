//! Runtime state shared between inputs and actions.
//!
//! Inputs (GPS, odometry, ...) publish named dynamic variables and actions
//! read them back at call time. The connector only reads; writers live
//! elsewhere in the agent.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for runtime state implementations.
pub trait RuntimeStateProvider: Send + Sync {
    /// Get the current value of a dynamic variable, if one is set.
    fn get_dynamic_variable(&self, name: &str) -> Option<Value>;
}

/// In-memory runtime state.
///
/// Values are stored as JSON so that any input can publish any shape.
#[derive(Debug, Default)]
pub struct MemoryRuntimeState {
    variables: RwLock<HashMap<String, Value>>,
}

impl MemoryRuntimeState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a dynamic variable, replacing any previous value.
    pub fn add_dynamic_variable(&self, name: &str, value: impl Into<Value>) {
        let mut vars = self
            .variables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        vars.insert(name.to_string(), value.into());
    }

    /// Remove a dynamic variable, returning its last value.
    pub fn remove_dynamic_variable(&self, name: &str) -> Option<Value> {
        self.variables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name)
    }

    /// Remove every variable.
    pub fn clear(&self) {
        self.variables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Number of variables currently set.
    pub fn len(&self) -> usize {
        self.variables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RuntimeStateProvider for MemoryRuntimeState {
    fn get_dynamic_variable(&self, name: &str) -> Option<Value> {
        self.variables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }
}
