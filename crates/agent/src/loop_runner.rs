//! The tool-calling loop.
//!
//! Each turn renders the prompt with the scratchpad so far, sends it with the
//! registry's tool definitions, and executes whatever calls the model asks
//! for. The loop ends when the model answers with text only.

use std::sync::Arc;

use archivist_core::message::Message;
use archivist_core::provider::{Provider, ProviderRequest};
use archivist_core::tool::{ToolCall, ToolRegistry};
use archivist_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::prompt::{PromptTemplate, PromptValues};

/// Placeholder the loop fills with the model's intermediate tool trace.
pub const SCRATCHPAD: &str = "agent_scratchpad";

/// Output used when the iteration cap is reached before a final answer.
pub const ITERATION_LIMIT_OUTPUT: &str = "Agent stopped due to iteration limit.";

/// What one run of the loop produced.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// The model's final text, or [`ITERATION_LIMIT_OUTPUT`]
    pub output: String,

    /// Model calls made
    pub iterations: u32,

    /// Tool calls executed
    pub tool_calls: u32,

    /// Whether the iteration cap cut the run short
    pub stopped_early: bool,
}

/// The core agent loop that orchestrates LLM calls and tool execution.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Maximum model turns per run
    max_iterations: u32,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            max_iterations: 15,
        }
    }

    /// Set the maximum number of model turns.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the loop to completion.
    ///
    /// Tool failures end the run with the tool's error; nothing is reported
    /// back to the model as an error string.
    pub async fn run(&self, template: &PromptTemplate, values: PromptValues) -> Result<LoopOutcome> {
        let mut values = values;
        let mut scratchpad: Vec<Message> = Vec::new();
        let tool_definitions = self.tools.definitions();
        let mut tool_calls_made = 0;

        for iteration in 1..=self.max_iterations {
            values.set_messages(SCRATCHPAD, scratchpad.clone());
            let messages = template
                .format(&values)
                .map_err(|e| Error::Internal(format!("prompt rendering failed: {e}")))?;

            debug!(
                iteration,
                messages = messages.len(),
                "Agent loop iteration"
            );

            let request = ProviderRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                debug!(
                    model = %response.model,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "Model responded"
                );
            }

            if response.message.tool_calls.is_empty() {
                info!(iteration, tool_calls = tool_calls_made, "Model produced final answer");
                return Ok(LoopOutcome {
                    output: response.message.content,
                    iterations: iteration,
                    tool_calls: tool_calls_made,
                    stopped_early: false,
                });
            }

            let requested = response.message.tool_calls.clone();
            scratchpad.push(response.message);

            for tc in &requested {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: parse_arguments(&tc.name, &tc.arguments)?,
                };

                info!(tool = %call.name, arguments = %tc.arguments, "Invoking tool");
                let start = std::time::Instant::now();
                let result = self.tools.execute(&call).await.inspect_err(|e| {
                    warn!(tool = %call.name, error = %e, "Tool execution failed");
                })?;
                debug!(
                    tool = %call.name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    output_len = result.output.len(),
                    "Tool finished"
                );

                tool_calls_made += 1;
                scratchpad.push(Message::tool_result(&tc.id, result.output));
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "Max iterations reached without a final answer"
        );
        Ok(LoopOutcome {
            output: ITERATION_LIMIT_OUTPUT.to_string(),
            iterations: self.max_iterations,
            tool_calls: tool_calls_made,
            stopped_early: true,
        })
    }
}

/// Decode a tool call's JSON argument string. An empty string means `{}`.
fn parse_arguments(tool: &str, raw: &str) -> Result<serde_json::Value> {
    if raw.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(raw).map_err(|e| {
        archivist_core::error::ToolError::InvalidArguments(format!(
            "{tool}: arguments are not valid JSON: {e}"
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Segment;
    use crate::test_helpers::*;
    use archivist_core::error::ToolError;
    use archivist_core::message::Role;
    use archivist_core::tool::{Tool, ToolResult};
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes its input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }
        async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            Ok(ToolResult {
                call_id: String::new(),
                output: format!("echo: {}", arguments["text"].as_str().unwrap_or_default()),
            })
        }
    }

    fn template() -> PromptTemplate {
        PromptTemplate::new()
            .system([Segment::template("You are terse.")])
            .human([Segment::template("{input}")])
            .placeholder(SCRATCHPAD)
    }

    fn values() -> PromptValues {
        PromptValues::new().with_variable("input", "hello")
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        Arc::new(registry)
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(SequentialMockProvider::single_text("Hi there"));
        let agent = AgentLoop::new(provider.clone(), "mock-model", 0.0, registry());

        let outcome = agent.run(&template(), values()).await.unwrap();
        assert_eq!(outcome.output, "Hi there");
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.tool_calls, 0);
        assert!(!outcome.stopped_early);

        let requests = provider.requests();
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].tools[0].name, "echo");
    }

    #[tokio::test]
    async fn tool_result_fed_back_through_scratchpad() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call("echo", serde_json::json!({"text": "ping"}))],
            "",
            "done",
        ));
        let agent = AgentLoop::new(provider.clone(), "mock-model", 0.0, registry());

        let outcome = agent.run(&template(), values()).await.unwrap();
        assert_eq!(outcome.output, "done");
        assert_eq!(outcome.tool_calls, 1);

        let second = &provider.requests()[1].messages;
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].role, Role::Assistant);
        assert_eq!(second[3].role, Role::Tool);
        assert_eq!(second[3].content, "echo: ping");
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_echo"));
    }

    #[tokio::test]
    async fn unknown_tool_propagates() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call("missing", serde_json::json!({}))],
            "",
            "unreachable",
        ));
        let agent = AgentLoop::new(provider.clone(), "mock-model", 0.0, registry());

        let err = agent.run(&template(), values()).await.unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::NotFound(_))));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn malformed_arguments_are_invalid_arguments() {
        let mut call = make_tool_call("echo", serde_json::json!({}));
        call.arguments = "{not json".into();
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(vec![call], "", "x"));
        let agent = AgentLoop::new(provider, "mock-model", 0.0, registry());

        let err = agent.run(&template(), values()).await.unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn iteration_cap_stops_loop() {
        let responses = (0..3)
            .map(|_| {
                make_tool_call_response(
                    vec![make_tool_call("echo", serde_json::json!({"text": "again"}))],
                    "",
                )
            })
            .collect();
        let provider = Arc::new(SequentialMockProvider::new(responses));
        let agent =
            AgentLoop::new(provider.clone(), "mock-model", 0.0, registry()).with_max_iterations(3);

        let outcome = agent.run(&template(), values()).await.unwrap();
        assert_eq!(outcome.output, ITERATION_LIMIT_OUTPUT);
        assert!(outcome.stopped_early);
        assert_eq!(outcome.tool_calls, 3);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn provider_failure_surfaces() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let agent = AgentLoop::new(provider, "mock-model", 0.0, registry());
        let err = agent.run(&template(), values()).await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[test]
    fn empty_arguments_mean_empty_object() {
        assert_eq!(parse_arguments("echo", "").unwrap(), serde_json::json!({}));
    }
}
