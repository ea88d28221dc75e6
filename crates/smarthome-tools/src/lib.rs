//! Tool framework for the smarthome crew
//!
//! Tools are capabilities an agent may invoke while working on a task.
//! Each agent owns a [`ToolRegistry`] holding the tools it was declared with.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
