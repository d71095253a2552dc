//! The House DJ research agent.
//!
//! Wraps the tool-calling loop with a fixed archivist persona and the
//! record's format instructions, then turns the model's final text into a
//! validated [`HouseDj`].

use std::sync::Arc;

use archivist_config::AppConfig;
use archivist_core::provider::Provider;
use archivist_core::tool::ToolRegistry;
use archivist_core::{Error, HouseDj, Result};
use tracing::{error, info};

use crate::extract;
use crate::loop_runner::{AgentLoop, SCRATCHPAD};
use crate::prompt::{PromptTemplate, PromptValues, Segment};

/// Placeholder for prior conversation turns. Always empty: each request
/// stands alone.
pub const CHAT_HISTORY: &str = "chat_history";

/// Template variable holding the caller's query.
pub const INPUT: &str = "input";

const PERSONA: &str = "You are an expert electronic music archivist. Your goal is to research and provide \
comprehensive, accurate information about House DJs and electronic music history.\n\
Always cite your sources when you use information obtained via search.\n\
If you can't find relevant information, state that clearly.\n\
Your final answer MUST be a JSON object conforming to the following schema:\n";

/// Model settings for a research run.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub max_iterations: u32,
}

impl AgentSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_iterations: config.max_iterations,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Answers one question about a House DJ with a validated record.
///
/// Holds only immutable configuration; `run` may be called any number of
/// times.
pub struct ResearchAgent {
    provider: Arc<dyn Provider>,
    agent_loop: AgentLoop,
    template: PromptTemplate,
}

impl ResearchAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: ToolRegistry, settings: AgentSettings) -> Self {
        let agent_loop = AgentLoop::new(
            provider.clone(),
            settings.model,
            settings.temperature,
            Arc::new(tools),
        )
        .with_max_iterations(settings.max_iterations)
        .with_max_tokens(settings.max_tokens);

        Self {
            provider,
            agent_loop,
            template: research_prompt(),
        }
    }

    /// Build the provider and the search tool from configuration.
    ///
    /// Fails with [`Error::Config`] when the search credential is missing.
    /// Makes no network calls.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = archivist_providers::build_from_config(config)
            .map_err(|e| Error::config(format!("completion backend: {e}")))?;
        let tools = archivist_tools::default_registry(&config.search)?;

        info!(
            model = %config.model,
            temperature = config.temperature,
            provider = %config.provider.name,
            tools = tools.len(),
            "Research agent configured"
        );

        Ok(Self::new(provider, tools, AgentSettings::from_config(config)))
    }

    /// Check that the completion backend answers and serves the model.
    ///
    /// A backend that lists no models at all is trusted; one that lists
    /// models without the configured one is a configuration error.
    pub async fn verify_backend(&self) -> Result<()> {
        let backend = self.provider.name();
        match self.provider.health_check().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(Error::config(format!(
                    "completion backend '{backend}' is not reachable"
                )));
            }
            Err(e) => {
                return Err(Error::config(format!(
                    "completion backend '{backend}' is not reachable: {e}"
                )));
            }
        }

        let model = self.agent_loop.model();
        let models = self.provider.list_models().await.map_err(|e| {
            Error::config(format!("completion backend '{backend}' could not list models: {e}"))
        })?;
        if models.is_empty() || models.iter().any(|m| serves_model(m, model)) {
            info!(backend, model, "Completion backend verified");
            return Ok(());
        }

        Err(Error::config(format!(
            "model '{model}' is not available on completion backend '{backend}'"
        )))
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.template
    }

    /// Research `query` and return the structured record.
    pub async fn run(&self, query: &str) -> Result<HouseDj> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query must not be empty".into()));
        }

        info!(query, model = self.agent_loop.model(), "Agent received research query");

        let values = PromptValues::new()
            .with_variable(INPUT, query)
            .with_messages(CHAT_HISTORY, Vec::new());

        let outcome = self
            .agent_loop
            .run(&self.template, values)
            .await
            .inspect_err(|e| error!(query, error = %e, "Research run failed"))?;

        info!(
            iterations = outcome.iterations,
            tool_calls = outcome.tool_calls,
            stopped_early = outcome.stopped_early,
            "Agent finished; extracting record"
        );

        extract::parse_house_dj(&outcome.output)
    }
}

/// Ollama lists `mistral:latest` for a request naming `mistral`.
fn serves_model(listed: &str, wanted: &str) -> bool {
    listed == wanted
        || listed
            .strip_prefix(wanted)
            .is_some_and(|tag| tag.starts_with(':'))
}

/// The research prompt: persona and schema, history, query, scratchpad.
pub fn research_prompt() -> PromptTemplate {
    PromptTemplate::new()
        .system([
            Segment::literal(PERSONA),
            Segment::literal(HouseDj::format_instructions()),
        ])
        .placeholder(CHAT_HISTORY)
        .human([Segment::template(format!("{{{INPUT}}}"))])
        .placeholder(SCRATCHPAD)
}
