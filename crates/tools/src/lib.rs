//! Tools for Archivist.
//!
//! The agent gets a single capability: `web_search`, backed by the Serper
//! API and wrapped in a bounded, randomized-backoff retry.

pub mod error;
pub mod retry;
pub mod serper;

pub use error::SearchError;
pub use retry::{Exhausted, RetryPolicy};
pub use serper::{SearchBackend, SerperBackend, SerperSearchTool};

use archivist_config::SearchConfig;
use archivist_core::tool::ToolRegistry;

/// Create the tool registry used by the research agent.
///
/// Fails with a configuration error when no Serper credential is available.
pub fn default_registry(config: &SearchConfig) -> archivist_core::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SerperSearchTool::from_config(config)?));
    Ok(registry)
}
