//! The research agent: prompt, tool-calling loop, structured output.
//!
//! A request flows through three steps:
//!
//! 1. **Render** the research prompt (persona + schema, the query, and the
//!    scratchpad of tool calls so far)
//! 2. **Loop**: send it to the model with the tool definitions; execute any
//!    tool calls it returns and go again, until it answers with text only
//! 3. **Extract** the first fenced JSON block and validate it into a
//!    [`archivist_core::HouseDj`]
//!
//! Every failure along the way is returned as a typed
//! [`archivist_core::Error`].

pub mod extract;
pub mod loop_runner;
pub mod prompt;
pub mod research;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use extract::{fenced_block, parse_house_dj};
pub use loop_runner::{AgentLoop, ITERATION_LIMIT_OUTPUT, LoopOutcome};
pub use prompt::{PromptTemplate, PromptValues, Segment, TemplateError};
pub use research::{AgentSettings, ResearchAgent, research_prompt};
