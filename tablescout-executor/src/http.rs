use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tablescout_core::{ExecutionError, Row, SchemaSource, SqlExecutor, TableMetadata};

use crate::HttpExecutorError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    sql: &'a str,
}

/// Client for a standalone executor service exposing `/mcp/execute_sql_query`
/// and `/mcp/refresh_schema_metadata`.
#[derive(Clone)]
pub struct HttpSqlExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for HttpSqlExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSqlExecutor")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpSqlExecutor {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpExecutorError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpExecutorError> {
        let base_url = base_url.into().trim().to_string();
        if base_url.is_empty() {
            return Err(HttpExecutorError::InvalidConfig(
                "base_url cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<JsonValue, HttpExecutorError> {
        let response = self.client.post(self.endpoint(path)).json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HttpExecutorError::HttpStatus {
                status: status.as_u16(),
                message: service_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|err| HttpExecutorError::InvalidResponse {
            message: format!("failed to decode executor response: {err}"),
        })
    }

    pub async fn run_query(&self, sql: &str) -> Result<Vec<Row>, HttpExecutorError> {
        let response = self
            .post_json("mcp/execute_sql_query", &ExecuteRequest { sql })
            .await?;
        let JsonValue::Array(items) = response else {
            return Err(HttpExecutorError::InvalidResponse {
                message: "expected a JSON array of rows".to_string(),
            });
        };

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            match item {
                JsonValue::Object(row) => rows.push(row),
                other => {
                    return Err(HttpExecutorError::InvalidResponse {
                        message: format!("expected a JSON object per row, got {other}"),
                    })
                }
            }
        }

        // The service reports SQL failures as a single `{"error": ...}` row.
        if let [row] = rows.as_slice() {
            if row.len() == 1 {
                if let Some(JsonValue::String(message)) = row.get("error") {
                    return Err(HttpExecutorError::Backend(message.clone()));
                }
            }
        }

        tracing::debug!(rows = rows.len(), "executor service returned rows");
        Ok(rows)
    }

    pub async fn describe_tables(&self) -> Result<Vec<TableMetadata>, HttpExecutorError> {
        let response = self
            .post_json("mcp/refresh_schema_metadata", &serde_json::json!({}))
            .await?;
        serde_json::from_value(response).map_err(|err| HttpExecutorError::InvalidResponse {
            message: format!("invalid schema metadata: {err}"),
        })
    }
}

fn service_error_message(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<JsonValue>(trimmed)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(JsonValue::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| trimmed.to_string())
}

#[async_trait]
impl SqlExecutor for HttpSqlExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutionError> {
        self.run_query(sql).await.map_err(ExecutionError::from)
    }
}

#[async_trait]
impl SchemaSource for HttpSqlExecutor {
    async fn inspect_schema(&self) -> Result<Vec<TableMetadata>, ExecutionError> {
        self.describe_tables().await.map_err(ExecutionError::from)
    }
}
