//! Crew orchestration for smarthome
//!
//! Agents and tasks are described in YAML ([`AgentsConfig`], [`TasksConfig`]),
//! turned into [`Task`]s and bound to agents, then run one after another by a
//! [`Crew`].

pub mod config;
pub mod crew;
pub mod error;
pub mod output;
pub mod process;
pub mod task;

// Re-export for convenience
pub use config::{AgentConfig, AgentsConfig, ConfigMap, TaskConfig, TasksConfig};
pub use crew::{Crew, CrewBuilder};
pub use error::{CrewError, Result};
pub use output::{CrewOutput, TaskOutput};
pub use process::Process;
pub use task::{RenderedTask, Task};
