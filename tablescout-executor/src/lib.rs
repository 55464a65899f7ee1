//! SQL execution backends for TableScout: Postgres via sqlx and the HTTP
//! executor service.

mod error;
mod guard;
mod http;
mod postgres;
mod samples;

pub use error::{HttpExecutorError, PostgresExecutorError};
pub use guard::{is_plain_identifier, normalize_statement, ReadOnlyGuard};
pub use http::HttpSqlExecutor;
pub use postgres::{PostgresSqlExecutor, PostgresSqlExecutorBuilder};
pub use samples::{column_samples, DEFAULT_SAMPLE_LIMIT};
