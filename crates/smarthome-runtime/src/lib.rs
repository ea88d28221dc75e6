//! Agent runtime for the smarthome crew
//!
//! This crate provides the [`AgentExecutor`], which drives the
//! LLM → tool calls → LLM loop, and [`RoleAgent`], the role/goal/backstory
//! agent every crew member is built from.

pub mod agents;
pub mod executor;

// Re-export key types
pub use agents::{RoleAgent, RoleAgentBuilder};
pub use executor::{AgentExecutor, ExecutionOutcome, ExecutorConfig};
