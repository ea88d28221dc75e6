//! Task definition and prompt composition

use crate::config::TaskConfig;
use smarthome_core::{Agent, Inputs, Result, interpolate};
use std::fmt;
use std::sync::Arc;

/// A unit of work performed by one agent
#[derive(Clone)]
pub struct Task {
    name: String,
    description: String,
    expected_output: String,
    agent: Option<Arc<dyn Agent>>,
    agent_key: Option<String>,
    output_file: Option<String>,
    context: Option<Vec<String>>,
}

/// Task text with crew inputs filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTask {
    pub description: String,
    pub expected_output: String,
    pub output_file: Option<String>,
}

impl Task {
    /// Create a task with no agent binding
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: None,
            agent_key: None,
            output_file: None,
            context: None,
        }
    }

    /// Create a task from its YAML entry
    ///
    /// The entry's `agent` key becomes the default binding; an explicit
    /// [`Task::with_agent`] takes precedence.
    pub fn from_config(name: impl Into<String>, config: &TaskConfig) -> Self {
        Self {
            name: name.into(),
            description: config.description.clone(),
            expected_output: config.expected_output.clone(),
            agent: None,
            agent_key: config.agent.clone(),
            output_file: config.output_file.clone(),
            context: config.context.clone(),
        }
    }

    /// Bind the task to an agent
    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Bind the task to the crew agent with this name
    pub fn with_agent_key(mut self, key: impl Into<String>) -> Self {
        self.agent_key = Some(key.into());
        self
    }

    /// Write the task output to this file
    pub fn with_output_file(mut self, path: impl Into<String>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Use only the output of these earlier tasks as context
    pub fn with_context(mut self, tasks: Vec<String>) -> Self {
        self.context = Some(tasks);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn agent(&self) -> Option<&Arc<dyn Agent>> {
        self.agent.as_ref()
    }

    pub fn agent_key(&self) -> Option<&str> {
        self.agent_key.as_deref()
    }

    pub fn output_file(&self) -> Option<&str> {
        self.output_file.as_deref()
    }

    pub fn context(&self) -> Option<&[String]> {
        self.context.as_deref()
    }

    /// Fill `{placeholders}` in the description, expected output and output file
    pub fn render(&self, inputs: &Inputs) -> Result<RenderedTask> {
        Ok(RenderedTask {
            description: interpolate(&self.description, inputs)?,
            expected_output: interpolate(&self.expected_output, inputs)?,
            output_file: self
                .output_file
                .as_deref()
                .map(|path| interpolate(path, inputs))
                .transpose()?,
        })
    }
}

impl RenderedTask {
    /// Prompt handed to the agent
    pub fn prompt(&self, context: Option<&str>) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             you MUST return the actual complete content as the final answer, not a summary.",
            self.description.trim_end(),
            self.expected_output.trim_end()
        );
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(context);
        }
        prompt
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("agent", &self.agent.as_ref().map(|a| a.name().to_string()))
            .field("agent_key", &self.agent_key)
            .field("output_file", &self.output_file)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(value: &str) -> Inputs {
        Inputs::from([("topic".to_string(), value.to_string())])
    }

    #[test]
    fn test_from_config_keeps_yaml_binding() {
        let config = TaskConfig {
            description: "Review {topic}".to_string(),
            expected_output: "A report".to_string(),
            agent: Some("reporting_analyst".to_string()),
            output_file: Some("first_report.md".to_string()),
            context: None,
        };
        let task = Task::from_config("reporting_task", &config);

        assert_eq!(task.name(), "reporting_task");
        assert_eq!(task.agent_key(), Some("reporting_analyst"));
        assert_eq!(task.output_file(), Some("first_report.md"));
        assert!(task.agent().is_none());
    }

    #[test]
    fn test_render_interpolates() {
        let task = Task::new("t", "Research {topic}", "Ten facts about {topic}")
            .with_output_file("{topic}.md");
        let rendered = task.render(&topic("Rust")).unwrap();

        assert_eq!(rendered.description, "Research Rust");
        assert_eq!(rendered.expected_output, "Ten facts about Rust");
        assert_eq!(rendered.output_file.as_deref(), Some("Rust.md"));
    }

    #[test]
    fn test_render_missing_input() {
        let task = Task::new("t", "Research {topic}", "Facts");
        assert!(matches!(
            task.render(&Inputs::new()),
            Err(smarthome_core::Error::MissingInput(_))
        ));
    }

    #[test]
    fn test_prompt_without_context() {
        let rendered = Task::new("t", "Do research\n", "Ten bullets\n")
            .render(&Inputs::new())
            .unwrap();
        assert_eq!(
            rendered.prompt(None),
            "Do research\n\nThis is the expected criteria for your final answer: Ten bullets\n\
             you MUST return the actual complete content as the final answer, not a summary."
        );
        assert_eq!(rendered.prompt(Some("  ")), rendered.prompt(None));
    }

    #[test]
    fn test_prompt_with_context() {
        let rendered = Task::new("t", "Write the report", "A report")
            .render(&Inputs::new())
            .unwrap();
        let prompt = rendered.prompt(Some("- finding one"));
        assert!(prompt.ends_with("\n\nThis is the context you're working with:\n- finding one"));
    }
}
