//! Conversation turns exchanged with the model while an agent works a task
//!
//! An agent's run is a user turn with the task prompt, then alternating
//! assistant turns (an answer or tool calls) and user turns carrying the
//! tool results. The persona travels separately as the system prompt.

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The crew side: task prompts and tool results
    User,
    /// The model
    Assistant,
}

/// One piece of a structured turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },

    /// The model asks for one of the agent's tools
    ToolUse {
        /// Call id, echoed back in the matching result
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Output of a tool call, fed back to the model
    ToolResult {
        tool_use_id: String,
        content: String,
        /// Set when the tool failed or was unknown
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Plain text or a list of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    /// Task prompt or other crew-side text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Final answer text from the model
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Model turn that may request tool calls
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(blocks)),
        }
    }

    /// Successful tool output for call `tool_use_id`
    pub fn tool_result(tool_use_id: String, result: String) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content: result,
                is_error: None,
            }])),
        }
    }

    /// Failed tool call; the run continues and the model sees the error
    pub fn tool_error(tool_use_id: String, error: String) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content: error,
                is_error: Some(true),
            }])),
        }
    }

    /// First text in the turn
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(s)) => Some(s),
            Some(MessageContent::Blocks(blocks)) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
            None => None,
        }
    }

    /// Tool calls requested in this turn
    pub fn tool_uses(&self) -> Vec<&ContentBlock> {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter(|b| matches!(b, ContentBlock::ToolUse { .. }))
                .collect(),
            _ => vec![],
        }
    }

    pub fn has_tool_uses(&self) -> bool {
        !self.tool_uses().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_prompt_is_user_turn() {
        let msg = Message::user("Conduct a thorough research about AI LLMs");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("Conduct a thorough research about AI LLMs"));
    }

    #[test]
    fn test_portfolio_result_is_not_a_tool_call() {
        let msg = Message::tool_result("call_1".to_string(), "VUG".to_string());
        assert_eq!(msg.role, Role::User);
        assert!(!msg.has_tool_uses());
        assert_eq!(msg.text(), None);
    }

    #[test]
    fn test_researcher_requests_portfolio_tool() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::Text {
                text: "Checking the portfolio".to_string(),
            },
            ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "get_position_with_highest_value".to_string(),
                input: json!({"argument": "portfolio"}),
            },
        ]);

        assert!(msg.has_tool_uses());
        assert_eq!(msg.tool_uses().len(), 1);
        assert_eq!(msg.text(), Some("Checking the portfolio"));
    }

    #[test]
    fn test_failed_search_is_flagged() {
        let msg = Message::tool_error(
            "call_9".to_string(),
            "SERPER_API_KEY is not set".to_string(),
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "tool_result");
        assert_eq!(json["content"][0]["is_error"], true);
    }
}
