use thiserror::Error;
use tablescout_core::IndexError;

#[derive(Debug, Error)]
pub enum WeaviateIndexError {
    #[error("invalid configuration: base_url is required")]
    MissingBaseUrl,
    #[error("invalid configuration: base_url cannot be empty")]
    EmptyBaseUrl,
    #[error("invalid configuration: class_name cannot be empty")]
    EmptyClassName,
    #[error("invalid configuration: class_name '{class_name}' {reason}")]
    InvalidClassName { class_name: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid table name: '{0}'")]
    InvalidTableName(String),
    #[error("request to weaviate failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("class '{class_name}' not found: {message}")]
    ClassNotFound { class_name: String, message: String },
    #[error("weaviate returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("invalid weaviate response: {message}")]
    InvalidResponse { message: String },
    #[error("weaviate batch {operation} failed: {message}")]
    BatchFailed { operation: String, message: String },
}

impl From<WeaviateIndexError> for IndexError {
    fn from(value: WeaviateIndexError) -> Self {
        match value {
            WeaviateIndexError::Request(err) => IndexError::Unavailable(err.to_string()),
            WeaviateIndexError::InvalidResponse { message } => IndexError::InvalidResponse(message),
            other => IndexError::Internal(Box::new(other)),
        }
    }
}
