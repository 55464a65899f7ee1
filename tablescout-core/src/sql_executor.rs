use async_trait::async_trait;

use crate::{ExecutionError, TableMetadata, Value};

/// One result row, column name to value.
pub type Row = serde_json::Map<String, Value>;

#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutionError>;
}

/// Anything that can describe the tables of the target database.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn inspect_schema(&self) -> Result<Vec<TableMetadata>, ExecutionError>;
}
