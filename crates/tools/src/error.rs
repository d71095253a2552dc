//! Search failures.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Search backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Search request failed: {0}")]
    Transport(String),

    #[error("Search response could not be decoded: {0}")]
    Decode(String),

    #[error("Search for '{query}' gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        query: String,
        attempts: u32,
        last: Box<SearchError>,
    },
}
