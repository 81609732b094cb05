//! Error types for machineid-crew

use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Device API answered with a body that is not JSON
    #[error("non-JSON response (HTTP {status}): {body}")]
    NonJson { status: u16, body: String },

    /// Transport-level HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// LLM endpoint failure
    #[error("llm error: {0}")]
    Llm(String),

    /// Crew construction or kickoff failure
    #[error("crew error: {0}")]
    Crew(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
