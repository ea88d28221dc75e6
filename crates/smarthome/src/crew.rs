//! Agent and task declarations of the smarthome crew

use smarthome_core::{Agent, Inputs};
use smarthome_crew::{AgentsConfig, Crew, Process, Task, TasksConfig};
use smarthome_llm::Llm;
use smarthome_runtime::RoleAgent;
use smarthome_tools::Tool;
use smarthome_utils::ProjectConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::tools::{HighestValuePositionTool, SerperConfig, SerperDevTool};

/// Directory of the bundled `agents.yaml` and `tasks.yaml`
pub const CONFIG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config");

/// File the reporting task writes, relative to the output directory
pub const REPORT_FILE: &str = "first_report.md";

/// Inputs for one run: the research topic and the current year
pub fn default_inputs(topic: &str, current_year: i32) -> Inputs {
    Inputs::from([
        ("topic".to_string(), topic.to_string()),
        ("current_year".to_string(), current_year.to_string()),
    ])
}

/// Builds the researcher, the reporting analyst and their tasks
pub struct SmarthomeCrew {
    agents_config: AgentsConfig,
    tasks_config: TasksConfig,
    llm: Llm,
    search: SerperConfig,
    output_dir: PathBuf,
}

impl SmarthomeCrew {
    /// Load the YAML definitions named by `project`
    pub fn new(project: &ProjectConfig, llm: Llm) -> Result<Self> {
        let agents_config = AgentsConfig::load(project.agents_path())?;
        let tasks_config = TasksConfig::load(project.tasks_path())?;
        info!(
            project = %project.name,
            agents = agents_config.len(),
            tasks = tasks_config.len(),
            "Loaded crew configuration"
        );
        Ok(Self::from_configs(agents_config, tasks_config, llm)
            .with_output_dir(project.output_dir()))
    }

    /// Use already parsed definitions
    pub fn from_configs(agents_config: AgentsConfig, tasks_config: TasksConfig, llm: Llm) -> Self {
        Self {
            agents_config,
            tasks_config,
            llm,
            search: SerperConfig::from_env(),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_search_config(mut self, search: SerperConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Researcher, with the portfolio tool
    pub fn researcher(&self) -> Result<RoleAgent> {
        let portfolio: Arc<dyn Tool> = Arc::new(HighestValuePositionTool::new());
        self.role_agent("researcher", vec![portfolio])
    }

    /// Reporting analyst, with web search
    pub fn reporting_analyst(&self) -> Result<RoleAgent> {
        let search: Arc<dyn Tool> = Arc::new(SerperDevTool::new(self.search.clone())?);
        self.role_agent("reporting_analyst", vec![search])
    }

    /// Research task, performed by `researcher`
    pub fn research_task(&self, researcher: Arc<dyn Agent>) -> Result<Task> {
        let config = self.tasks_config.get("research_task")?;
        Ok(Task::from_config("research_task", config).with_agent(researcher))
    }

    /// Reporting task; its agent comes from the `agent` key of its definition
    pub fn reporting_task(&self) -> Result<Task> {
        let config = self.tasks_config.get("reporting_task")?;
        Ok(Task::from_config("reporting_task", config).with_output_file(REPORT_FILE))
    }

    /// The whole crew, running both tasks in sequence
    pub fn crew(&self) -> Result<Crew> {
        let researcher: Arc<dyn Agent> = Arc::new(self.researcher()?);
        let reporting_analyst: Arc<dyn Agent> = Arc::new(self.reporting_analyst()?);

        let crew = Crew::builder()
            .agents([researcher.clone(), reporting_analyst])
            .task(self.research_task(researcher)?)
            .task(self.reporting_task()?)
            .process(Process::Sequential)
            .verbose(true)
            .output_dir(self.output_dir.clone())
            .build()?;
        Ok(crew)
    }

    fn role_agent(&self, key: &str, tools: Vec<Arc<dyn Tool>>) -> Result<RoleAgent> {
        let config = self.agents_config.get(key)?;

        let mut builder = RoleAgent::builder(key)
            .role(config.role.as_str())
            .goal(config.goal.as_str())
            .backstory(config.backstory.as_str())
            .tools(tools)
            .verbose(config.verbose.unwrap_or(true))
            .allow_delegation(config.allow_delegation.unwrap_or(false))
            .llm(self.llm.clone());
        if let Some(max_iter) = config.max_iter {
            builder = builder.max_iterations(max_iter);
        }

        Ok(builder.build()?)
    }
}
