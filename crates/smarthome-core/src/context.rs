//! Execution context for agents
//!
//! The `Context` struct carries crew inputs and task metadata to agents
//! while a crew runs.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Crew inputs used to fill `{placeholder}` variables
pub type Inputs = BTreeMap<String, String>;

/// Well-known context keys
pub mod keys {
    /// Crew inputs (`Inputs`)
    pub const INPUTS: &str = "inputs";
    /// Name of the task currently executing
    pub const TASK_NAME: &str = "task_name";
    /// Position of the current task within the crew (zero based)
    pub const TASK_INDEX: &str = "task_index";
    /// Raw outputs of completed tasks, keyed by task name
    pub const TASK_OUTPUTS: &str = "task_outputs";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use smarthome_core::{Context, Inputs};
///
/// let mut inputs = Inputs::new();
/// inputs.insert("topic".to_string(), "AI LLMs".to_string());
///
/// let ctx = Context::new()
///     .with_inputs(inputs)
///     .with_task("research_task", 0);
///
/// assert_eq!(ctx.task_name(), Some("research_task"));
/// assert_eq!(ctx.inputs().get("topic").map(String::as_str), Some("AI LLMs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the crew inputs
    pub fn with_inputs(mut self, inputs: Inputs) -> Self {
        self.set_inputs(&inputs);
        self
    }

    /// Set the current task
    pub fn with_task(mut self, name: impl Into<String>, index: usize) -> Self {
        self.set_task(name, index);
        self
    }

    /// Crew inputs, empty when none were given
    pub fn inputs(&self) -> Inputs {
        self.get_typed(keys::INPUTS).ok().flatten().unwrap_or_default()
    }

    /// Replace the crew inputs
    pub fn set_inputs(&mut self, inputs: &Inputs) {
        self.insert(keys::INPUTS, serde_json::json!(inputs));
    }

    /// Name of the task being executed
    pub fn task_name(&self) -> Option<&str> {
        self.get(keys::TASK_NAME).and_then(|v| v.as_str())
    }

    /// Index of the task being executed
    pub fn task_index(&self) -> Option<usize> {
        self.get(keys::TASK_INDEX)
            .and_then(serde_json::Value::as_u64)
            .map(|i| i as usize)
    }

    /// Mark a task as the one being executed
    pub fn set_task(&mut self, name: impl Into<String>, index: usize) {
        self.insert(keys::TASK_NAME, serde_json::json!(name.into()));
        self.insert(keys::TASK_INDEX, serde_json::json!(index));
    }

    /// Record the raw output of a completed task
    pub fn record_task_output(&mut self, name: impl Into<String>, output: impl Into<String>) {
        let mut outputs = self.task_outputs();
        outputs.insert(name.into(), output.into());
        self.insert(keys::TASK_OUTPUTS, serde_json::json!(outputs));
    }

    /// Raw outputs of the tasks completed so far
    pub fn task_outputs(&self) -> BTreeMap<String, String> {
        self.get_typed(keys::TASK_OUTPUTS)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert!(ctx.inputs().is_empty());
        assert!(ctx.task_outputs().is_empty());
        assert_eq!(ctx.task_name(), None);
        assert_eq!(ctx.task_index(), None);
    }

    #[test]
    fn test_inputs_roundtrip() {
        let mut inputs = Inputs::new();
        inputs.insert("topic".to_string(), "AI LLMs".to_string());
        inputs.insert("current_year".to_string(), "2026".to_string());

        let ctx = Context::new().with_inputs(inputs.clone());
        assert_eq!(ctx.inputs(), inputs);
    }

    #[test]
    fn test_task_tracking() {
        let mut ctx = Context::new().with_task("research_task", 0);
        assert_eq!(ctx.task_name(), Some("research_task"));
        assert_eq!(ctx.task_index(), Some(0));

        ctx.set_task("reporting_task", 1);
        assert_eq!(ctx.task_name(), Some("reporting_task"));
        assert_eq!(ctx.task_index(), Some(1));
    }

    #[test]
    fn test_record_task_outputs() {
        let mut ctx = Context::new();
        ctx.record_task_output("research_task", "ten bullet points");
        ctx.record_task_output("reporting_task", "# Report");

        let outputs = ctx.task_outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs["research_task"], "ten bullet points");
        assert_eq!(outputs["reporting_task"], "# Report");
    }

    #[test]
    fn test_typed_insert_get() {
        let mut ctx = Context::new();
        ctx.insert("count", serde_json::json!(3));
        assert!(ctx.contains_key("count"));
        let value: Option<u32> = ctx.get_typed("count").unwrap();
        assert_eq!(value, Some(3));

        let missing: Option<u32> = ctx.get_typed("missing").unwrap();
        assert!(missing.is_none());
    }
}
