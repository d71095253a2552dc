//! # Archivist Core
//!
//! Domain types, traits, and error definitions for the Archivist research agent.
//! This crate has **no runtime dependencies**; it defines the domain model
//! that the provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! The completion backend and every capability the model may call are traits
//! here. Implementations live in their respective crates, which keeps the
//! agent loop testable with scripted mocks.

pub mod error;
pub mod house_dj;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use house_dj::{HouseDj, SchemaError, Violation};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
