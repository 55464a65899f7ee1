use tablescout_core::ExecutionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostgresExecutorError {
    #[error("failed to connect to postgres: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("postgres query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unexpected row shape: {0}")]
    InvalidRow(String),
}

impl From<PostgresExecutorError> for ExecutionError {
    fn from(value: PostgresExecutorError) -> Self {
        match value {
            PostgresExecutorError::Rejected(reason) => ExecutionError::Rejected(reason),
            PostgresExecutorError::Query(err) => match err {
                sqlx::Error::Database(db) => ExecutionError::Backend(db.message().to_string()),
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    ExecutionError::Unavailable(err.to_string())
                }
                other => ExecutionError::Internal(Box::new(other)),
            },
            PostgresExecutorError::Connection(err) => ExecutionError::Unavailable(err.to_string()),
            other => ExecutionError::Internal(Box::new(other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpExecutorError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("request to executor service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("executor service returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("invalid executor service response: {message}")]
    InvalidResponse { message: String },
    #[error("{0}")]
    Backend(String),
}

impl From<HttpExecutorError> for ExecutionError {
    fn from(value: HttpExecutorError) -> Self {
        match value {
            HttpExecutorError::Request(err) => ExecutionError::Unavailable(err.to_string()),
            HttpExecutorError::Backend(message) => ExecutionError::Backend(message),
            HttpExecutorError::HttpStatus { status, message } => {
                ExecutionError::Backend(format!("HTTP {status}: {message}"))
            }
            other => ExecutionError::Internal(Box::new(other)),
        }
    }
}
