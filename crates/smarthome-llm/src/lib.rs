//! LLM layer for the smarthome crew
//!
//! This crate provides provider-agnostic types for talking to a chat model
//! and the endpoint configuration shared by every agent:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Tool definitions for function calling
//! - The [`LLMProvider`] trait and an OpenAI-compatible implementation
//! - [`LlmConfig`] / [`Llm`]: model, key, base URL and extra headers

pub mod completion;
pub mod config;
pub mod error;
pub mod messages;
pub mod provider;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use config::{Llm, LlmConfig};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
