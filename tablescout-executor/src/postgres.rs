use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::types::Json;
use tablescout_core::{
    ColumnMetadata, ExecutionError, ForeignKeyMetadata, Row, SchemaSource, SqlExecutor,
    TableMetadata, Value,
};

use crate::guard::{is_plain_identifier, normalize_statement, ReadOnlyGuard};
use crate::PostgresExecutorError;

const TABLES_QUERY: &str = "SELECT table_name::text \
     FROM information_schema.tables \
     WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

const COLUMNS_QUERY: &str = "SELECT c.table_name::text, c.column_name::text, c.udt_name::text \
     FROM information_schema.columns c \
     JOIN information_schema.tables t \
       ON t.table_schema = c.table_schema AND t.table_name = c.table_name \
     WHERE c.table_schema = $1 AND t.table_type = 'BASE TABLE' \
     ORDER BY c.table_name, c.ordinal_position";

const FOREIGN_KEYS_QUERY: &str = "SELECT kcu.table_name::text, kcu.column_name::text, \
            pk.table_name::text, pk.column_name::text \
     FROM information_schema.referential_constraints rc \
     JOIN information_schema.key_column_usage kcu \
       ON kcu.constraint_schema = rc.constraint_schema \
      AND kcu.constraint_name = rc.constraint_name \
     JOIN information_schema.key_column_usage pk \
       ON pk.constraint_schema = rc.unique_constraint_schema \
      AND pk.constraint_name = rc.unique_constraint_name \
      AND pk.ordinal_position = kcu.position_in_unique_constraint \
     WHERE kcu.table_schema = $1 \
     ORDER BY kcu.table_name, kcu.constraint_name, kcu.ordinal_position";

/// Runs generated SQL against Postgres and returns each row as a JSON object.
#[derive(Debug, Clone)]
pub struct PostgresSqlExecutor {
    pool: sqlx::PgPool,
    schema: String,
    guard: Option<ReadOnlyGuard>,
}

#[derive(Debug, Clone)]
pub struct PostgresSqlExecutorBuilder {
    database_url: String,
    max_connections: u32,
    min_connections: u32,
    schema: String,
    read_only: bool,
}

impl PostgresSqlExecutor {
    pub fn builder(database_url: impl Into<String>) -> PostgresSqlExecutorBuilder {
        PostgresSqlExecutorBuilder {
            database_url: database_url.into(),
            max_connections: 5,
            min_connections: 0,
            schema: "public".to_string(),
            read_only: true,
        }
    }

    /// Wraps an existing pool with the default settings (`public`, read-only).
    pub fn from_pool(pool: sqlx::PgPool) -> Result<Self, PostgresExecutorError> {
        Ok(Self {
            pool,
            schema: "public".to_string(),
            guard: Some(read_only_guard()?),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn is_read_only(&self) -> bool {
        self.guard.is_some()
    }

    pub async fn run_query(&self, sql: &str) -> Result<Vec<Row>, PostgresExecutorError> {
        let statement = normalize_statement(sql)
            .ok_or_else(|| PostgresExecutorError::Rejected("SQL query is required".to_string()))?;

        if let Some(keyword) = self
            .guard
            .as_ref()
            .and_then(|guard| guard.violation(statement))
        {
            tracing::warn!(%keyword, "rejected statement in read-only mode");
            return Err(PostgresExecutorError::Rejected(format!(
                "{keyword} statements are not allowed in read-only mode"
            )));
        }

        let wrapped = wrap_row_to_json(statement);
        let mut tx = self.pool.begin().await?;
        if self.guard.is_some() {
            sqlx::query("SET TRANSACTION READ ONLY")
                .execute(&mut *tx)
                .await?;
        }
        let rows: Vec<Json<Value>> = sqlx::query_scalar(&wrapped).fetch_all(&mut *tx).await?;
        tx.commit().await?;

        tracing::debug!(rows = rows.len(), "query executed");
        rows.into_iter()
            .map(|Json(value)| match value {
                Value::Object(row) => Ok(row),
                other => Err(PostgresExecutorError::InvalidRow(format!(
                    "expected a JSON object, got {other}"
                ))),
            })
            .collect()
    }

    pub async fn describe_tables(&self) -> Result<Vec<TableMetadata>, PostgresExecutorError> {
        let names: Vec<String> = sqlx::query_scalar(TABLES_QUERY)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await?;
        let mut tables: BTreeMap<String, TableMetadata> = names
            .into_iter()
            .map(|name| {
                let table = TableMetadata {
                    name: name.clone(),
                    columns: Vec::new(),
                    foreign_keys: Vec::new(),
                };
                (name, table)
            })
            .collect();

        let columns: Vec<(String, String, String)> = sqlx::query_as(COLUMNS_QUERY)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await?;
        for (table_name, name, data_type) in columns {
            if let Some(table) = tables.get_mut(&table_name) {
                table.columns.push(ColumnMetadata { name, data_type });
            }
        }

        let foreign_keys: Vec<(String, String, String, String)> =
            sqlx::query_as(FOREIGN_KEYS_QUERY)
                .bind(&self.schema)
                .fetch_all(&self.pool)
                .await?;
        for (table_name, fk_column, target_table, pk_column) in foreign_keys {
            if let Some(table) = tables.get_mut(&table_name) {
                table.foreign_keys.push(ForeignKeyMetadata {
                    target_table,
                    fk_column,
                    pk_column,
                });
            }
        }

        Ok(tables.into_values().collect())
    }
}

impl PostgresSqlExecutorBuilder {
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn min_connections(mut self, min_connections: u32) -> Self {
        self.min_connections = min_connections;
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub async fn build(self) -> Result<PostgresSqlExecutor, PostgresExecutorError> {
        if !is_plain_identifier(&self.schema) || self.schema.contains('.') {
            return Err(PostgresExecutorError::InvalidConfig(format!(
                "schema '{}' is not a plain identifier",
                self.schema
            )));
        }
        let guard = if self.read_only {
            Some(read_only_guard()?)
        } else {
            None
        };

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect(&self.database_url)
            .await
            .map_err(PostgresExecutorError::Connection)?;

        Ok(PostgresSqlExecutor {
            pool,
            schema: self.schema,
            guard,
        })
    }
}

/// The closing parenthesis sits on its own line so a `--` comment inside
/// `statement` cannot swallow it.
fn wrap_row_to_json(statement: &str) -> String {
    format!("SELECT row_to_json(t) FROM ({statement}\n) t")
}

fn read_only_guard() -> Result<ReadOnlyGuard, PostgresExecutorError> {
    ReadOnlyGuard::new().map_err(|err| PostgresExecutorError::InvalidConfig(err.to_string()))
}

#[async_trait]
impl SqlExecutor for PostgresSqlExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutionError> {
        self.run_query(sql).await.map_err(ExecutionError::from)
    }
}

#[async_trait]
impl SchemaSource for PostgresSqlExecutor {
    async fn inspect_schema(&self) -> Result<Vec<TableMetadata>, ExecutionError> {
        self.describe_tables().await.map_err(ExecutionError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::wrap_row_to_json;

    #[test]
    fn wrapped_statement_closes_on_its_own_line() {
        assert_eq!(
            wrap_row_to_json("SELECT a -- pick a\nFROM t"),
            "SELECT row_to_json(t) FROM (SELECT a -- pick a\nFROM t\n) t"
        );
        assert!(wrap_row_to_json("SELECT 1 -- trailing").ends_with("\n) t"));
    }
}
