use std::sync::Arc;

use tablescout_core::{
    DdlLookup, ExecutionError, IndexError, Llm, LlmRequest, Message, Row, Runnable, SchemaIndex,
    ScoutError, SqlExecutor, TableHit, TableNeighbor,
};

/// Thin wrapper over a [`SchemaIndex`].
#[derive(Clone)]
pub struct RetrievalClient {
    index: Arc<dyn SchemaIndex>,
}

impl RetrievalClient {
    pub fn new(index: Arc<dyn SchemaIndex>) -> Self {
        Self { index }
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<TableHit>, IndexError> {
        self.index.search(query, limit).await
    }

    pub async fn table_ddl(
        &self,
        table_names: &[String],
        minimal: bool,
    ) -> Result<DdlLookup, IndexError> {
        self.index.table_ddl(table_names, minimal).await
    }

    pub async fn neighbors(&self, table_name: &str) -> Result<Vec<TableNeighbor>, IndexError> {
        self.index.neighbors(table_name).await
    }
}

/// Sends one system + user message pair to the model.
#[derive(Clone)]
pub struct GenerationClient {
    llm: Arc<dyn Llm>,
    model: String,
    temperature: f32,
}

impl GenerationClient {
    /// An empty `model` defers to the LLM client's own default.
    pub fn new(llm: Arc<dyn Llm>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
        }
    }

    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, ScoutError> {
        let request = LlmRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(prompt)],
            temperature: Some(self.temperature),
        };
        let response = self.llm.invoke(request).await?;
        Ok(response.content)
    }
}

#[derive(Clone)]
pub struct ExecutionClient {
    executor: Arc<dyn SqlExecutor>,
}

impl ExecutionClient {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    pub async fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutionError> {
        self.executor.execute(sql).await
    }
}
