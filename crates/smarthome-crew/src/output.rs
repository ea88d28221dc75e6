//! Results of a crew run

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Output of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutput {
    /// Task name
    pub name: String,
    /// Task description with inputs filled in
    pub description: String,
    /// Name of the agent that performed the task
    pub agent: String,
    /// Final answer of the agent
    pub raw: String,
    /// File the answer was written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

/// Output of a whole crew run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewOutput {
    /// Final answer of the last task
    pub raw: String,
    /// Every task output, in execution order
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Output of the task with this name
    pub fn task(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
