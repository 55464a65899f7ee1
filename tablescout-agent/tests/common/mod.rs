#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tablescout_agent::prompts::PLAN_SYSTEM_PROMPT;
use tablescout_agent::{AgentConfig, SqlAgent};
use tablescout_core::{
    DdlLookup, ExecutionError, IndexError, LlmRequest, LlmResponse, Row, Runnable, SchemaIndex,
    ScoutError, SqlExecutor, TableHit, TableNeighbor, Value,
};

pub fn hit(name: &str) -> TableHit {
    TableHit {
        table_name: name.to_string(),
        description: None,
        relevance_score: 0.5,
    }
}

pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub struct StubIndex {
    pub hits: Result<Vec<TableHit>, String>,
    pub ddl: Result<Vec<(String, String)>, String>,
    pub search_calls: AtomicUsize,
    pub ddl_calls: AtomicUsize,
    pub requested: Mutex<Vec<Vec<String>>>,
}

impl StubIndex {
    pub fn new(hits: Vec<TableHit>, ddl: &[(&str, &str)]) -> Self {
        Self {
            hits: Ok(hits),
            ddl: Ok(ddl
                .iter()
                .map(|(name, ddl)| (name.to_string(), ddl.to_string()))
                .collect()),
            search_calls: AtomicUsize::new(0),
            ddl_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_search(message: &str) -> Self {
        Self {
            hits: Err(message.to_string()),
            ..Self::new(Vec::new(), &[])
        }
    }

    pub fn calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst) + self.ddl_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaIndex for StubIndex {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<TableHit>, IndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.hits
            .clone()
            .map(|hits| hits.into_iter().take(limit).collect())
            .map_err(IndexError::Unavailable)
    }

    async fn table_ddl(
        &self,
        table_names: &[String],
        _minimal: bool,
    ) -> Result<DdlLookup, IndexError> {
        self.ddl_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(table_names.to_vec());
        let ddl = self.ddl.clone().map_err(IndexError::Unavailable)?;
        // Backend order, restricted to what was asked for.
        Ok(ddl
            .into_iter()
            .filter(|(name, _)| table_names.contains(name))
            .collect())
    }

    async fn neighbors(&self, _table_name: &str) -> Result<Vec<TableNeighbor>, IndexError> {
        Ok(Vec::new())
    }
}

/// Answers the planning prompt and the generation prompt separately.
pub struct StubLlm {
    pub plan: Result<String, String>,
    pub sql: Result<String, String>,
    pub plan_calls: AtomicUsize,
    pub sql_calls: AtomicUsize,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl StubLlm {
    pub fn new(plan: &str, sql: &str) -> Self {
        Self {
            plan: Ok(plan.to_string()),
            sql: Ok(sql.to_string()),
            plan_calls: AtomicUsize::new(0),
            sql_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst) + self.sql_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for StubLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ScoutError> {
        let is_plan = input
            .messages
            .first()
            .map(|message| message.content == PLAN_SYSTEM_PROMPT)
            .unwrap_or(false);
        self.requests.lock().unwrap().push(input);

        let answer = if is_plan {
            self.plan_calls.fetch_add(1, Ordering::SeqCst);
            self.plan.clone()
        } else {
            self.sql_calls.fetch_add(1, Ordering::SeqCst);
            self.sql.clone()
        };
        answer
            .map(|content| LlmResponse { content })
            .map_err(ScoutError::LlmProvider)
    }
}

pub struct StubExecutor {
    pub rows: Result<Vec<Row>, String>,
    pub calls: AtomicUsize,
    pub statements: Mutex<Vec<String>>,
}

impl StubExecutor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Ok(rows),
            calls: AtomicUsize::new(0),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            rows: Err(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SqlExecutor for StubExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.statements.lock().unwrap().push(sql.to_string());
        self.rows.clone().map_err(ExecutionError::Backend)
    }
}

pub fn build_agent(
    index: &Arc<StubIndex>,
    llm: &Arc<StubLlm>,
    executor: &Arc<StubExecutor>,
) -> SqlAgent {
    SqlAgent::builder()
        .index(index.clone())
        .llm(llm.clone())
        .executor(executor.clone())
        .config(AgentConfig::default())
        .build()
        .expect("agent should build")
}
