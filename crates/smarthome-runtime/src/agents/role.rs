//! Role-playing agent
//!
//! A [`RoleAgent`] is described by a role, a goal and a backstory. All three
//! may contain `{placeholders}` that are filled from the crew inputs at the
//! time the agent works on a task.

use crate::executor::{AgentExecutor, ExecutorConfig};
use async_trait::async_trait;
use smarthome_core::{Agent, Context, Error, Inputs, Result, interpolate};
use smarthome_llm::Llm;
use smarthome_tools::{Tool, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Agent that works on tasks under a persona
pub struct RoleAgent {
    key: String,
    role: String,
    goal: String,
    backstory: String,
    verbose: bool,
    allow_delegation: bool,
    executor: AgentExecutor,
}

impl RoleAgent {
    /// Start building an agent identified by `key`
    pub fn builder(key: impl Into<String>) -> RoleAgentBuilder {
        RoleAgentBuilder::new(key)
    }

    /// Goal template
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Backstory template
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    /// Whether progress is logged at info level
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the agent was configured to delegate work
    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }

    /// Tools available to the agent
    pub fn tools(&self) -> &ToolRegistry {
        self.executor.tools()
    }

    /// LLM the agent reasons with
    pub fn llm(&self) -> &Llm {
        self.executor.llm()
    }

    /// Maximum tool-calling iterations per task
    pub fn max_iterations(&self) -> usize {
        self.executor.config().max_iterations
    }

    /// Persona sent as the system prompt, with inputs filled in
    ///
    /// Surrounding whitespace left by YAML block scalars is dropped.
    pub fn system_prompt(&self, inputs: &Inputs) -> Result<String> {
        let role = interpolate(self.role.trim(), inputs)?;
        let backstory = interpolate(self.backstory.trim(), inputs)?;
        let goal = interpolate(self.goal.trim(), inputs)?;
        Ok(format!(
            "You are {role}. {backstory}\nYour personal goal is: {goal}"
        ))
    }
}

impl std::fmt::Debug for RoleAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleAgent")
            .field("key", &self.key)
            .field("role", &self.role)
            .field("tools", &self.tools().names())
            .field("verbose", &self.verbose)
            .field("allow_delegation", &self.allow_delegation)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Agent for RoleAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let system_prompt = self.system_prompt(&context.inputs())?;
        let task = context.task_name().unwrap_or("<unnamed>").to_string();

        if self.verbose {
            info!(agent = %self.key, task = %task, "Agent started task");
        } else {
            debug!(agent = %self.key, task = %task, "Agent started task");
        }

        let outcome = self.executor.run(&system_prompt, input).await?;

        if self.verbose {
            info!(
                agent = %self.key,
                task = %task,
                iterations = outcome.iterations,
                tools_used = ?outcome.tools_used,
                total_tokens = outcome.usage.total(),
                "Agent finished task"
            );
        } else {
            debug!(
                agent = %self.key,
                task = %task,
                iterations = outcome.iterations,
                total_tokens = outcome.usage.total(),
                "Agent finished task"
            );
        }

        Ok(outcome.output)
    }

    fn name(&self) -> &str {
        &self.key
    }

    fn role(&self) -> &str {
        &self.role
    }

    fn validate_inputs(&self, inputs: &Inputs) -> Result<()> {
        self.system_prompt(inputs).map(|_| ())
    }
}

/// Builder for [`RoleAgent`]
pub struct RoleAgentBuilder {
    key: String,
    role: Option<String>,
    goal: Option<String>,
    backstory: Option<String>,
    tools: ToolRegistry,
    verbose: bool,
    allow_delegation: bool,
    llm: Option<Llm>,
    config: ExecutorConfig,
}

impl RoleAgentBuilder {
    /// Create a builder for the agent identified by `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            role: None,
            goal: None,
            backstory: None,
            tools: ToolRegistry::new(),
            verbose: false,
            allow_delegation: false,
            llm: None,
            config: ExecutorConfig::default(),
        }
    }

    /// Set the role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the goal
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    /// Set the backstory
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = Some(backstory.into());
        self
    }

    /// Give the agent a tool
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    /// Give the agent several tools
    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        for tool in tools {
            self.tools.register(tool);
        }
        self
    }

    /// Log progress at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Record whether the agent may delegate
    pub fn allow_delegation(mut self, allow_delegation: bool) -> Self {
        self.allow_delegation = allow_delegation;
        self
    }

    /// Set the LLM
    pub fn llm(mut self, llm: Llm) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the maximum tool-calling iterations per task
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<RoleAgent> {
        let missing = |field: &str| {
            Error::InitializationFailed(format!("Agent '{}' has no {field}", self.key))
        };
        let role = self.role.clone().ok_or_else(|| missing("role"))?;
        let goal = self.goal.clone().ok_or_else(|| missing("goal"))?;
        let backstory = self.backstory.clone().ok_or_else(|| missing("backstory"))?;
        let llm = self.llm.clone().ok_or_else(|| missing("llm"))?;

        if self.allow_delegation {
            warn!(
                agent = %self.key,
                "Delegation is not supported; the agent will work on its tasks alone"
            );
        }

        Ok(RoleAgent {
            key: self.key,
            role,
            goal,
            backstory,
            verbose: self.verbose,
            allow_delegation: self.allow_delegation,
            executor: AgentExecutor::new(llm, self.tools, self.config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthome_llm::{
        CompletionRequest, CompletionResponse, LLMProvider, LlmConfig, Message, StopReason,
        TokenUsage,
    };
    use std::sync::Mutex;

    struct RecordingProvider {
        systems: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl LLMProvider for RecordingProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> smarthome_llm::Result<CompletionResponse> {
            self.systems.lock().unwrap().push(request.system.clone());
            Ok(CompletionResponse {
                message: Message::assistant("report"),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn llm(provider: Arc<RecordingProvider>) -> Llm {
        Llm::with_provider(LlmConfig::new("openai/test-model"), provider)
    }

    fn researcher(provider: Arc<RecordingProvider>) -> RoleAgent {
        RoleAgent::builder("researcher")
            .role("{topic} Senior Data Researcher\n")
            .goal("Uncover cutting-edge developments in {topic}")
            .backstory("You're a seasoned researcher.")
            .llm(llm(provider))
            .verbose(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_system_prompt_interpolates_inputs() {
        let provider = Arc::new(RecordingProvider {
            systems: Mutex::new(Vec::new()),
        });
        let agent = researcher(provider);
        let inputs = Inputs::from([("topic".to_string(), "AI LLMs".to_string())]);

        assert_eq!(
            agent.system_prompt(&inputs).unwrap(),
            "You are AI LLMs Senior Data Researcher. You're a seasoned researcher.\n\
             Your personal goal is: Uncover cutting-edge developments in AI LLMs"
        );
    }

    #[test]
    fn test_system_prompt_missing_input() {
        let provider = Arc::new(RecordingProvider {
            systems: Mutex::new(Vec::new()),
        });
        let agent = researcher(provider);
        let err = agent.system_prompt(&Inputs::new()).unwrap_err();
        assert!(matches!(err, Error::MissingInput(name) if name == "topic"));
    }

    #[test]
    fn test_validate_inputs_checks_persona() {
        let provider = Arc::new(RecordingProvider {
            systems: Mutex::new(Vec::new()),
        });
        let agent = researcher(provider.clone());

        assert!(matches!(
            agent.validate_inputs(&Inputs::new()),
            Err(Error::MissingInput(name)) if name == "topic"
        ));
        let inputs = Inputs::from([("topic".to_string(), "AI LLMs".to_string())]);
        assert!(agent.validate_inputs(&inputs).is_ok());
        assert!(provider.systems.lock().unwrap().is_empty());
    }

    #[test]
    fn test_build_requires_llm() {
        let result = RoleAgent::builder("analyst")
            .role("Analyst")
            .goal("Report")
            .backstory("Meticulous")
            .build();
        assert!(matches!(result, Err(Error::InitializationFailed(_))));
    }

    #[test]
    fn test_delegation_flag_is_kept() {
        let provider = Arc::new(RecordingProvider {
            systems: Mutex::new(Vec::new()),
        });
        let agent = RoleAgent::builder("analyst")
            .role("Analyst")
            .goal("Report")
            .backstory("Meticulous")
            .allow_delegation(true)
            .max_iterations(3)
            .llm(llm(provider))
            .build()
            .unwrap();
        assert!(agent.allow_delegation());
        assert_eq!(agent.max_iterations(), 3);
        assert!(agent.tools().is_empty());
    }

    #[tokio::test]
    async fn test_process_sends_persona() {
        let provider = Arc::new(RecordingProvider {
            systems: Mutex::new(Vec::new()),
        });
        let agent = researcher(provider.clone());
        let inputs = Inputs::from([("topic".to_string(), "Rust".to_string())]);
        let mut context = Context::new()
            .with_inputs(inputs)
            .with_task("research_task", 0);

        let output = agent
            .process("Research Rust".to_string(), &mut context)
            .await
            .unwrap();

        assert_eq!(output, "report");
        assert_eq!(agent.name(), "researcher");
        assert_eq!(agent.role(), "{topic} Senior Data Researcher\n");
        let systems = provider.systems.lock().unwrap();
        assert!(
            systems[0]
                .as_deref()
                .unwrap()
                .starts_with("You are Rust Senior Data Researcher.")
        );
    }
}
