//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the core agent loop pattern:
//! 1. Call LLM with conversation history and available tools
//! 2. Check stop reason
//! 3. If tool use requested, execute tools and loop back
//! 4. If completed, return final response
//!
//! When the iteration budget runs out the model is asked once more, without
//! tools, for its best final answer.

use serde_json::Value;
use smarthome_core::Result;
use smarthome_llm::{
    CompletionRequest, CompletionResponse, ContentBlock, Llm, Message, StopReason, TokenUsage,
};
use smarthome_tools::ToolRegistry;
use tracing::{debug, info, warn};

const FORCE_FINAL_ANSWER: &str = "You have used all available steps. Do not call any more tools; \
give your best complete final answer now.";

/// Configuration for agent execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    /// Maximum number of LLM calls that may request tools
    pub max_iterations: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { max_iterations: 20 }
    }
}

/// Result of one executor run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// Final answer text
    pub output: String,
    /// Tokens used across all LLM calls
    pub usage: TokenUsage,
    /// Number of LLM calls made
    pub iterations: usize,
    /// Names of the tools called, in call order
    pub tools_used: Vec<String>,
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    llm: Llm,
    tool_registry: ToolRegistry,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(llm: Llm, tool_registry: ToolRegistry, config: ExecutorConfig) -> Self {
        Self {
            llm,
            tool_registry,
            config,
        }
    }

    /// Tools this executor offers to the model
    pub fn tools(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// LLM this executor talks to
    pub fn llm(&self) -> &Llm {
        &self.llm
    }

    /// Executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run the loop for one task prompt
    ///
    /// # Arguments
    ///
    /// * `system_prompt` - Agent persona
    /// * `user_message` - The task prompt
    pub async fn run(&self, system_prompt: &str, user_message: String) -> Result<ExecutionOutcome> {
        let mut conversation = vec![Message::user(user_message)];
        let mut usage = TokenUsage::default();
        let mut tools_used = Vec::new();
        let mut iteration = 0;

        loop {
            iteration += 1;

            if iteration > self.config.max_iterations {
                warn!(
                    max_iterations = self.config.max_iterations,
                    "Max iterations reached, forcing a final answer"
                );
                conversation.push(Message::user(FORCE_FINAL_ANSWER));
                let response = self.complete(system_prompt, &conversation, false).await?;
                usage += response.usage;
                return Ok(ExecutionOutcome {
                    output: final_text(&response),
                    usage,
                    iterations: iteration,
                    tools_used,
                });
            }

            info!(
                iteration = iteration,
                max_iterations = self.config.max_iterations,
                "Agent iteration started"
            );

            let response = self.complete(system_prompt, &conversation, true).await?;
            usage += response.usage;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            conversation.push(response.message.clone());

            match response.stop_reason {
                StopReason::EndTurn => {
                    let text = final_text(&response);
                    info!(
                        iteration = iteration,
                        response_length = text.len(),
                        "Agent completed naturally"
                    );
                    return Ok(ExecutionOutcome {
                        output: text,
                        usage,
                        iterations: iteration,
                        tools_used,
                    });
                }

                StopReason::ToolUse => {
                    let tool_results = self
                        .execute_tools(&response.message, &mut tools_used)
                        .await;

                    if tool_results.is_empty() {
                        warn!("No tool calls despite ToolUse stop reason");
                        return Ok(ExecutionOutcome {
                            output: final_text(&response),
                            usage,
                            iterations: iteration,
                            tools_used,
                        });
                    }

                    conversation.extend(tool_results);
                }

                StopReason::MaxTokens => {
                    warn!("Hit max tokens in LLM response, returning truncated answer");
                    return Ok(ExecutionOutcome {
                        output: final_text(&response),
                        usage,
                        iterations: iteration,
                        tools_used,
                    });
                }
            }
        }
    }

    async fn complete(
        &self,
        system_prompt: &str,
        conversation: &[Message],
        offer_tools: bool,
    ) -> Result<CompletionResponse> {
        let config = self.llm.config();
        let mut request_builder = CompletionRequest::builder(self.llm.model_name())
            .messages(conversation.to_vec())
            .system(system_prompt)
            .max_tokens(config.max_tokens);

        if let Some(temperature) = config.temperature {
            request_builder = request_builder.temperature(temperature);
        }

        if offer_tools && !self.tool_registry.is_empty() {
            request_builder = request_builder.tools(self.tool_registry.definitions());
        }

        debug!(
            model = %self.llm.model_name(),
            messages = conversation.len(),
            tool_count = if offer_tools { self.tool_registry.len() } else { 0 },
            "Sending request to LLM"
        );

        self.llm
            .provider()
            .complete(request_builder.build())
            .await
            .map_err(|e| smarthome_core::Error::ProcessingFailed(e.to_string()))
    }

    /// Execute tool calls from an assistant message
    ///
    /// Failures, including unknown tool names, are reported back to the
    /// model as error results rather than aborting the run.
    async fn execute_tools(&self, message: &Message, tools_used: &mut Vec<String>) -> Vec<Message> {
        let mut results = Vec::new();

        for tool_use in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = tool_use else {
                continue;
            };

            let input_preview: String = input.to_string().chars().take(500).collect();
            info!(
                tool_name = %name,
                tool_id = %id,
                input_preview = %input_preview,
                "Executing tool"
            );

            let Some(tool) = self.tool_registry.get(name) else {
                warn!(tool_name = %name, "Model requested an unknown tool");
                results.push(Message::tool_error(
                    id.clone(),
                    format!(
                        "Error: tool '{name}' does not exist. Available tools: {}",
                        self.tool_registry.names().join(", ")
                    ),
                ));
                continue;
            };

            tools_used.push(name.clone());
            let start_time = std::time::Instant::now();
            match tool.execute(input.clone()).await {
                Ok(result) => {
                    let duration_ms = start_time.elapsed().as_millis() as u64;
                    let result_str = render_tool_result(&result);
                    info!(
                        tool_name = %name,
                        duration_ms = duration_ms,
                        result_length = result_str.len(),
                        "Tool execution succeeded"
                    );
                    results.push(Message::tool_result(id.clone(), result_str));
                }
                Err(e) => {
                    let duration_ms = start_time.elapsed().as_millis() as u64;
                    warn!(
                        tool_name = %name,
                        duration_ms = duration_ms,
                        error = %e,
                        "Tool execution failed"
                    );
                    results.push(Message::tool_error(id.clone(), format!("Error: {e}")));
                }
            }
        }

        results
    }
}

/// Strings are passed through as-is, everything else as JSON
fn render_tool_result(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn final_text(response: &CompletionResponse) -> String {
    response.message.text().unwrap_or_default().to_string()
}
