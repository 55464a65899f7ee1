use async_trait::async_trait;
use tablescout_core::{GraphState, Runnable, ScoutError, StateUpdate};

use crate::prompts::{
    generation_prompt, schema_context, strip_code_fences, GENERATE_SYSTEM_PROMPT,
    PLAN_SYSTEM_PROMPT,
};
use crate::{
    AgentState, AgentStateUpdate, ExecutionClient, GenerationClient, RetrievalClient,
    StageFailure, TableRef,
};

/// Workflow position. Runs always move forward, `Done` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Plan,
    Explore,
    Generate,
    Execute,
    Done,
}

impl Stage {
    pub const PIPELINE: [Stage; 4] = [Stage::Plan, Stage::Explore, Stage::Generate, Stage::Execute];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Plan => "plan",
            Stage::Explore => "explore",
            Stage::Generate => "generate",
            Stage::Execute => "execute",
            Stage::Done => "done",
        }
    }

    pub fn next(self) -> Stage {
        match self {
            Stage::Plan => Stage::Explore,
            Stage::Explore => Stage::Generate,
            Stage::Generate => Stage::Execute,
            Stage::Execute | Stage::Done => Stage::Done,
        }
    }
}

/// Asks the model for search terms. Advisory only: failures are logged, never fatal.
pub struct PlanNode {
    generation: GenerationClient,
}

impl PlanNode {
    pub fn new(generation: GenerationClient) -> Self {
        Self { generation }
    }

    pub async fn run(&self, state: &AgentState) -> AgentStateUpdate {
        if state.has_error() {
            return AgentStateUpdate::default();
        }

        match self
            .generation
            .complete(PLAN_SYSTEM_PROMPT, &state.input_query)
            .await
        {
            Ok(terms) => {
                tracing::debug!(terms = %terms, "plan keywords");
                AgentStateUpdate::log(format!("Plan: Search for {terms}"))
            }
            Err(err) => {
                let failure = StageFailure::Planning(err.to_string());
                tracing::warn!(error = %err, "planning failed; continuing");
                AgentStateUpdate::log(failure.to_string())
            }
        }
    }
}

/// Finds candidate tables and loads their minimal DDL.
pub struct ExploreNode {
    retrieval: RetrievalClient,
    search_limit: usize,
}

impl ExploreNode {
    pub fn new(retrieval: RetrievalClient, search_limit: usize) -> Self {
        Self {
            retrieval,
            search_limit,
        }
    }

    pub async fn run(&self, state: &AgentState) -> AgentStateUpdate {
        if state.has_error() {
            return AgentStateUpdate::default();
        }

        let hits = match self
            .retrieval
            .search(&state.input_query, self.search_limit)
            .await
        {
            Ok(hits) => hits,
            Err(err) => return explore_failed(err),
        };

        let table_names: Vec<String> = hits.into_iter().map(|hit| hit.table_name).collect();
        if table_names.is_empty() {
            return AgentStateUpdate {
                relevant_tables: Some(Vec::new()),
                failure: Some(StageFailure::NoRelevantTablesFound),
                ..AgentStateUpdate::default()
            };
        }

        let ddl = match self.retrieval.table_ddl(&table_names, true).await {
            Ok(ddl) => ddl,
            Err(err) => return explore_failed(err),
        };

        let relevant_tables: Vec<TableRef> = ddl
            .into_iter()
            .map(|(name, ddl_minimal)| TableRef { name, ddl_minimal })
            .collect();
        tracing::debug!(
            searched = table_names.len(),
            found = relevant_tables.len(),
            "explored schema"
        );

        AgentStateUpdate {
            relevant_tables: Some(relevant_tables),
            ..AgentStateUpdate::default()
        }
    }
}

fn explore_failed(err: impl std::fmt::Display) -> AgentStateUpdate {
    tracing::debug!(error = %err, "schema retrieval failed");
    AgentStateUpdate::failed(StageFailure::Retrieval(err.to_string()))
}

/// Writes SQL from the retrieved DDL.
pub struct GenerateNode {
    generation: GenerationClient,
    dialect: String,
}

impl GenerateNode {
    pub fn new(generation: GenerationClient, dialect: impl Into<String>) -> Self {
        Self {
            generation,
            dialect: dialect.into(),
        }
    }

    pub async fn run(&self, state: &AgentState) -> AgentStateUpdate {
        if state.has_error() {
            return AgentStateUpdate::default();
        }

        let context = schema_context(&state.relevant_tables);
        if context.is_empty() {
            return AgentStateUpdate::failed(StageFailure::EmptyContext);
        }

        let prompt = generation_prompt(&self.dialect, &context, &state.input_query);
        match self
            .generation
            .complete(GENERATE_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(raw) => {
                let sql = strip_code_fences(&raw);
                if sql.is_empty() {
                    return AgentStateUpdate::failed(StageFailure::Generation(
                        "model returned no SQL".to_string(),
                    ));
                }
                tracing::debug!(sql = %sql, "generated sql");
                AgentStateUpdate {
                    sql_query: Some(sql),
                    ..AgentStateUpdate::default()
                }
            }
            Err(err) => AgentStateUpdate::failed(StageFailure::Generation(err.to_string())),
        }
    }
}

/// Runs the generated SQL.
pub struct ExecuteNode {
    execution: ExecutionClient,
}

impl ExecuteNode {
    pub fn new(execution: ExecutionClient) -> Self {
        Self { execution }
    }

    pub async fn run(&self, state: &AgentState) -> AgentStateUpdate {
        if state.has_error() {
            return AgentStateUpdate::default();
        }
        let Some(sql) = state.sql_query.as_deref() else {
            return AgentStateUpdate::failed(StageFailure::Execution(
                "no SQL query to execute".to_string(),
            ));
        };

        match self.execution.execute(sql).await {
            Ok(rows) => {
                tracing::debug!(rows = rows.len(), "executed sql");
                AgentStateUpdate {
                    execution_result: Some(rows),
                    ..AgentStateUpdate::default()
                }
            }
            Err(err) => AgentStateUpdate::failed(StageFailure::Execution(err.to_string())),
        }
    }
}

macro_rules! graph_node {
    ($($node:ty),+ $(,)?) => {$(
        #[async_trait]
        impl Runnable<GraphState<AgentState>, StateUpdate<AgentState>> for $node {
            async fn invoke(
                &self,
                input: GraphState<AgentState>,
            ) -> Result<StateUpdate<AgentState>, ScoutError> {
                Ok(StateUpdate::new(self.run(&input.data).await))
            }
        }
    )+};
}

graph_node!(PlanNode, ExploreNode, GenerateNode, ExecuteNode);
