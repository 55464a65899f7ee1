use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

/// Failure reported by a schema index backend.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("schema index unavailable: {0}")]
    Unavailable(String),
    #[error("invalid schema index response: {0}")]
    InvalidResponse(String),
    #[error("schema index error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}

/// Failure reported by a SQL execution backend.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("query rejected: {0}")]
    Rejected(String),
    #[error("database error: {0}")]
    Backend(String),
    #[error("executor unavailable: {0}")]
    Unavailable(String),
    #[error("execution error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}
