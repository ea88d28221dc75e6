//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use smarthome_core::Result;
use smarthome_llm::ToolDefinition;

/// Trait for tools that agents can execute
///
/// Each tool provides a name, a description the model reads to decide when
/// to call it, and the JSON Schema of its input. Tools are stateless from
/// the crew's point of view.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// `params` should match [`Tool::input_schema`]; the returned JSON is
    /// handed back to the model as the tool result.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Unique name within an agent's registry
    fn name(&self) -> &str;

    /// What the tool does
    fn description(&self) -> &str;

    /// Input schema (JSON Schema format)
    fn input_schema(&self) -> Value;

    /// Definition sent to the LLM
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}
