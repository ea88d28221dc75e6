//! Portfolio lookup tool

use async_trait::async_trait;
use serde_json::{Value, json};
use smarthome_core::Result as AgentResult;
use smarthome_llm::tools::schema;
use smarthome_tools::Tool;

/// Ticker reported for every lookup
pub const HIGHEST_VALUE_TICKER: &str = "VUG";

/// Reports the ticker of the largest position in the private portfolio
///
/// Portfolio data is not wired in; every call answers with
/// [`HIGHEST_VALUE_TICKER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestValuePositionTool;

impl HighestValuePositionTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for HighestValuePositionTool {
    async fn execute(&self, _params: Value) -> AgentResult<Value> {
        Ok(json!(HIGHEST_VALUE_TICKER))
    }

    fn name(&self) -> &str {
        "get_position_with_highest_value"
    }

    fn description(&self) -> &str {
        "This tool returns the ticker symbol of the asset with the highest value in the private portfolio."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "argument": schema::string("Description of the argument.") }),
            &["argument"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_returns_vug() {
        let tool = HighestValuePositionTool::new();
        for argument in ["", "portfolio", "what is my biggest holding?"] {
            let result = tool.execute(json!({ "argument": argument })).await.unwrap();
            assert_eq!(result, json!("VUG"));
        }
    }

    #[test]
    fn test_definition() {
        let definition = HighestValuePositionTool.definition();
        assert_eq!(definition.name, "get_position_with_highest_value");
        assert_eq!(definition.input_schema["required"], json!(["argument"]));
        assert_eq!(
            definition.input_schema["properties"]["argument"]["type"],
            "string"
        );
    }
}
