//! Error types for the Archivist domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] is what a
//! research request surfaces to its caller.

use thiserror::Error;

use crate::house_dj::SchemaError;

/// The top-level error type for all Archivist operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Construction-time failures ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Completion backend ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tools ---
    #[error("Tool error: {0}")]
    Tool(ToolError),

    #[error("Search failed after {attempts} attempt(s) for query '{query}': {message}")]
    UpstreamSearch {
        query: String,
        attempts: u32,
        message: String,
    },

    // --- Output extraction ---
    #[error("Model output did not contain a fenced JSON block. Raw output: {raw}")]
    OutputFormat { raw: String },

    #[error("Extracted block was not valid JSON: {source}")]
    JsonDecode {
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Extracted JSON did not conform to the HouseDJ schema: {0}")]
    SchemaValidation(#[from] SchemaError),

    // --- Generic ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Search exhaustion is promoted to its own variant so callers can tell an
/// upstream outage apart from a tool the model misused.
impl From<ToolError> for Error {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Upstream {
                query,
                attempts,
                reason,
                ..
            } => Error::UpstreamSearch {
                query,
                attempts,
                message: reason,
            },
            other => Error::Tool(other),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("{tool_name} gave up after {attempts} attempt(s) for '{query}': {reason}")]
    Upstream {
        tool_name: String,
        query: String,
        attempts: u32,
        reason: String,
    },
}
