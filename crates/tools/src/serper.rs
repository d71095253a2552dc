//! Web search backed by the Serper Google Search API.
//!
//! The raw Serper response is condensed into a single line of text (answer
//! box first, else knowledge graph plus organic snippets) before it is handed
//! back to the model.

use std::sync::Arc;
use std::time::Duration;

use archivist_config::{SERPER_API_KEY_ENV, SearchConfig};
use archivist_core::error::ToolError;
use archivist_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::SearchError;
use crate::retry::RetryPolicy;

/// Returned when a response carries nothing usable.
pub const NO_RESULTS: &str = "No good Google Search Result was found";

/// A transport that turns a query into a text summary.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, SearchError>;
}

/// The real Serper transport.
pub struct SerperBackend {
    api_key: String,
    endpoint: String,
    num_results: u32,
    gl: String,
    hl: String,
    client: reqwest::Client,
}

impl SerperBackend {
    pub fn new(api_key: impl Into<String>, config: &SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            endpoint: config.endpoint.clone(),
            num_results: config.num_results,
            gl: config.gl.clone(),
            hl: config.hl.clone(),
            client,
        })
    }

    fn request_body(&self, query: &str) -> Value {
        serde_json::json!({
            "q": query,
            "gl": self.gl,
            "hl": self.hl,
            "num": self.num_results,
        })
    }
}

#[async_trait]
impl SearchBackend for SerperBackend {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        Ok(summarize(&body, self.num_results as usize))
    }
}

/// Condense a Serper response into one line of text.
pub fn summarize(results: &Value, k: usize) -> String {
    if let Some(answer_box) = results.get("answerBox").filter(|v| is_truthy(v)) {
        if let Some(answer) = non_empty_str(answer_box.get("answer")) {
            return answer.to_string();
        }
        if let Some(snippet) = non_empty_str(answer_box.get("snippet")) {
            return snippet.replace('\n', " ");
        }
        if let Some(highlighted) = answer_box.get("snippetHighlighted").filter(|v| is_truthy(v)) {
            return match highlighted {
                Value::Array(parts) => parts
                    .iter()
                    .map(display_value)
                    .collect::<Vec<_>>()
                    .join(" "),
                other => display_value(other),
            };
        }
    }

    let mut snippets = Vec::new();

    if let Some(kg) = results.get("knowledgeGraph").filter(|v| is_truthy(v)) {
        let title = kg.get("title").map(display_value).unwrap_or_default();
        if let Some(entity_type) = non_empty_str(kg.get("type")) {
            snippets.push(format!("{title}: {entity_type}."));
        }
        if let Some(description) = non_empty_str(kg.get("description")) {
            snippets.push(description.to_string());
        }
        if let Some(Value::Object(attributes)) = kg.get("attributes") {
            for (attribute, value) in attributes {
                snippets.push(format!("{title} {attribute}: {}.", display_value(value)));
            }
        }
    }

    if let Some(Value::Array(organic)) = results.get("organic") {
        for result in organic.iter().take(k) {
            if let Some(snippet) = result.get("snippet") {
                snippets.push(display_value(snippet));
            }
            if let Some(Value::Object(attributes)) = result.get("attributes") {
                for (attribute, value) in attributes {
                    snippets.push(format!("{attribute}: {}.", display_value(value)));
                }
            }
        }
    }

    if snippets.is_empty() {
        return NO_RESULTS.to_string();
    }
    snippets.join(" ")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The `web_search` tool: a [`SearchBackend`] wrapped in a [`RetryPolicy`].
pub struct SerperSearchTool {
    backend: Arc<dyn SearchBackend>,
    retry: RetryPolicy,
}

impl SerperSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Build the tool from configuration.
    ///
    /// The key comes from `config.api_key` alone; `AppConfig::load` has
    /// already filled it from `SERPER_API_KEY`. Fails with a configuration
    /// error when it is missing or blank. No request is made here.
    pub fn from_config(config: &SearchConfig) -> archivist_core::Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                archivist_core::Error::config(format!(
                    "{SERPER_API_KEY_ENV} is not set and search.api_key is empty"
                ))
            })?;

        let backend = SerperBackend::new(api_key, config)
            .map_err(|e| archivist_core::Error::config(e.to_string()))?;

        Ok(Self::new(
            Arc::new(backend),
            RetryPolicy::from_config(&config.retry),
        ))
    }

    /// Search with retry. Returns the summary text.
    pub async fn search(&self, query: &str) -> Result<String, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        debug!(query, "Running web search");
        let backend = self.backend.as_ref();
        self.retry
            .run("web_search", move || backend.search(query))
            .await
            .map_err(|exhausted| SearchError::Exhausted {
                query: query.to_string(),
                attempts: exhausted.attempts,
                last: Box::new(exhausted.last),
            })
    }
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information about DJs, producers, labels and releases. \
         Input is a concise search query; output is a summary of the top results."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "A concise web search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        match self.search(query).await {
            Ok(output) => Ok(ToolResult {
                call_id: String::new(),
                output,
            }),
            Err(SearchError::EmptyQuery) => Err(ToolError::InvalidArguments(
                "'query' must not be empty".into(),
            )),
            Err(SearchError::Exhausted {
                query,
                attempts,
                last,
            }) => Err(ToolError::Upstream {
                tool_name: self.name().to_string(),
                query,
                attempts,
                reason: last.to_string(),
            }),
            Err(other) => Err(ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: other.to_string(),
            }),
        }
    }
}
