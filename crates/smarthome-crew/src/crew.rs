//! Crew definition and execution

use crate::output::{CrewOutput, TaskOutput};
use crate::process::Process;
use crate::task::{RenderedTask, Task};
use crate::{CrewError, Result};
use smarthome_core::{Agent, Context, Inputs};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// A task together with the agent that performs it
struct Step {
    task: Task,
    agent: Arc<dyn Agent>,
}

/// A group of agents working through a list of tasks
///
/// Tasks run strictly one after another: each agent call is awaited to
/// completion before the next task starts, and a task's output file is
/// written before the next task begins.
///
/// # Example
///
/// ```no_run
/// use smarthome_crew::{Crew, Task};
/// use smarthome_core::{Agent, Inputs};
/// use std::sync::Arc;
///
/// # async fn example(researcher: Arc<dyn Agent>) -> smarthome_crew::Result<()> {
/// let crew = Crew::builder()
///     .agent(researcher.clone())
///     .task(Task::new("research", "Research {topic}", "Ten bullet points").with_agent(researcher))
///     .build()?;
///
/// let inputs = Inputs::from([("topic".to_string(), "AI LLMs".to_string())]);
/// let output = crew.kickoff(inputs).await?;
/// println!("{output}");
/// # Ok(())
/// # }
/// ```
pub struct Crew {
    steps: Vec<Step>,
    process: Process,
    verbose: bool,
    output_dir: PathBuf,
}

impl Crew {
    /// Create a new crew builder
    pub fn builder() -> CrewBuilder {
        CrewBuilder::new()
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.steps.iter().map(|step| &step.task)
    }

    /// Name of the agent assigned to each task, in execution order
    pub fn assignments(&self) -> Vec<(&str, &str)> {
        self.steps
            .iter()
            .map(|step| (step.task.name(), step.agent.name()))
            .collect()
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run every task in order
    ///
    /// # Arguments
    ///
    /// * `inputs` - Values for the `{placeholders}` in tasks and agents
    ///
    /// # Returns
    ///
    /// The output of every task; the crew's final answer is the last one
    pub async fn kickoff(&self, inputs: Inputs) -> Result<CrewOutput> {
        // Fail on missing inputs or bad output paths before any agent runs
        let mut rendered = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            step.agent.validate_inputs(&inputs)?;
            let task = step.task.render(&inputs)?;
            if let Some(file) = &task.output_file {
                check_output_path(step.task.name(), file)?;
            }
            rendered.push(task);
        }

        info!(
            tasks = self.steps.len(),
            process = %self.process,
            "Crew kickoff"
        );

        let mut context = Context::new().with_inputs(inputs);
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.steps.len());

        for (index, (step, rendered)) in self.steps.iter().zip(rendered).enumerate() {
            let task_name = step.task.name();
            let agent_name = step.agent.name();
            context.set_task(task_name, index);

            let task_context = task_context(&step.task, &outputs);
            let prompt = rendered.prompt(task_context.as_deref());

            if self.verbose {
                info!(task = %task_name, agent = %agent_name, index = index, prompt = %prompt, "Task started");
            } else {
                debug!(task = %task_name, agent = %agent_name, index = index, "Task started");
            }

            let raw = step.agent.process(prompt, &mut context).await?;
            context.record_task_output(task_name, raw.clone());

            let output_file = self.write_output(&rendered, &raw).await?;

            if self.verbose {
                info!(
                    task = %task_name,
                    agent = %agent_name,
                    output_file = ?output_file,
                    answer = %raw,
                    "Task completed"
                );
            } else {
                debug!(task = %task_name, output_length = raw.len(), "Task completed");
            }

            outputs.push(TaskOutput {
                name: task_name.to_string(),
                description: rendered.description,
                agent: agent_name.to_string(),
                raw,
                output_file,
            });
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        info!(tasks = outputs.len(), "Crew finished");

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }

    async fn write_output(&self, rendered: &RenderedTask, raw: &str) -> Result<Option<PathBuf>> {
        let Some(file) = &rendered.output_file else {
            return Ok(None);
        };

        let path = self.output_dir.join(file);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CrewError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, raw)
            .await
            .map_err(|source| CrewError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = raw.len(), "Task output written");
        Ok(Some(path))
    }
}

/// Output files must stay under the output directory
fn check_output_path(task: &str, file: &str) -> Result<()> {
    let path = Path::new(file);
    let escapes = path.is_absolute()
        || path.has_root()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));

    if escapes {
        return Err(CrewError::InvalidOutputPath {
            task: task.to_string(),
            path: file.to_string(),
        });
    }
    Ok(())
}

/// Context passed to a task: the listed tasks' outputs, or all earlier ones
fn task_context(task: &Task, outputs: &[TaskOutput]) -> Option<String> {
    let selected: Vec<&str> = match task.context() {
        Some(names) => names
            .iter()
            .filter_map(|name| outputs.iter().find(|o| &o.name == name))
            .map(|o| o.raw.as_str())
            .collect(),
        None => outputs.iter().map(|o| o.raw.as_str()).collect(),
    };

    if selected.is_empty() {
        None
    } else {
        Some(selected.join(CONTEXT_SEPARATOR))
    }
}

/// Builder for constructing crews
pub struct CrewBuilder {
    agents: Vec<Arc<dyn Agent>>,
    tasks: Vec<Task>,
    process: Process,
    verbose: bool,
    output_dir: PathBuf,
}

impl Default for CrewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CrewBuilder {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            tasks: Vec::new(),
            process: Process::default(),
            verbose: false,
            output_dir: PathBuf::from("."),
        }
    }

    /// Add an agent to the crew
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Add several agents to the crew
    pub fn agents(mut self, agents: impl IntoIterator<Item = Arc<dyn Agent>>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Append a task; tasks run in the order they are added
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Append several tasks
    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn process(mut self, process: Process) -> Self {
        self.process = process;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Directory task output files are written to
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Build the crew, binding every task to exactly one agent
    pub fn build(self) -> Result<Crew> {
        if self.process != Process::Sequential {
            return Err(CrewError::UnsupportedProcess(self.process.to_string()));
        }
        if self.tasks.is_empty() {
            return Err(CrewError::EmptyCrew);
        }

        let mut steps: Vec<Step> = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            if let Some(file) = task.output_file() {
                check_output_path(task.name(), file)?;
            }
            for context in task.context().unwrap_or_default() {
                if !steps.iter().any(|s| s.task.name() == context) {
                    return Err(CrewError::UnknownContextTask {
                        task: task.name().to_string(),
                        context: context.clone(),
                    });
                }
            }

            let agent = resolve_agent(&task, &self.agents)?;
            debug!(task = %task.name(), agent = %agent.name(), "Task assigned");
            steps.push(Step { task, agent });
        }

        Ok(Crew {
            steps,
            process: self.process,
            verbose: self.verbose,
            output_dir: self.output_dir,
        })
    }
}

/// Explicit binding first, then the agent key from configuration
fn resolve_agent(task: &Task, agents: &[Arc<dyn Agent>]) -> Result<Arc<dyn Agent>> {
    if let Some(agent) = task.agent() {
        return Ok(agent.clone());
    }

    let key = task
        .agent_key()
        .ok_or_else(|| CrewError::NoAgentForTask(task.name().to_string()))?;

    agents
        .iter()
        .find(|agent| agent.name() == key)
        .cloned()
        .ok_or_else(|| CrewError::UnknownAgent {
            task: task.name().to_string(),
            agent: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(name: &str, raw: &str) -> TaskOutput {
        TaskOutput {
            name: name.to_string(),
            description: String::new(),
            agent: "a".to_string(),
            raw: raw.to_string(),
            output_file: None,
        }
    }

    #[test]
    fn test_context_defaults_to_all_previous_outputs() {
        let task = Task::new("third", "d", "e");
        let outputs = [output("first", "one"), output("second", "two")];
        assert_eq!(
            task_context(&task, &outputs).as_deref(),
            Some("one\n\n----------\n\ntwo")
        );
    }

    #[test]
    fn test_context_uses_listed_tasks() {
        let task = Task::new("third", "d", "e").with_context(vec!["second".to_string()]);
        let outputs = [output("first", "one"), output("second", "two")];
        assert_eq!(task_context(&task, &outputs).as_deref(), Some("two"));
    }

    #[test]
    fn test_output_path_must_stay_relative() {
        assert!(check_output_path("t", "first_report.md").is_ok());
        assert!(check_output_path("t", "reports/2026/first_report.md").is_ok());
        assert!(check_output_path("t", "./first_report.md").is_ok());

        for bad in ["/tmp/report.md", "../report.md", "reports/../../report.md"] {
            assert!(
                matches!(
                    check_output_path("t", bad),
                    Err(CrewError::InvalidOutputPath { ref path, .. }) if path == bad
                ),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_no_context_for_first_task() {
        let task = Task::new("first", "d", "e");
        assert_eq!(task_context(&task, &[]), None);

        let explicit_empty = Task::new("second", "d", "e").with_context(Vec::new());
        assert_eq!(task_context(&explicit_empty, &[output("first", "one")]), None);
    }
}
