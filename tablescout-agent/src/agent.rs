use std::sync::Arc;

use tablescout_core::{GraphState, Llm, SchemaIndex, ScoutError, SqlExecutor, StateSchema};
use tablescout_graph::{ExecutableGraph, GraphBuilder, Observer};

use crate::{
    AgentConfig, AgentState, AgentStateUpdate, ExecuteNode, ExecutionClient, ExploreNode,
    GenerateNode, GenerationClient, PlanNode, RetrievalClient, Stage, StageFailure,
};

/// Natural-language to SQL workflow: plan, explore, generate, execute.
///
/// Holds no per-run state; one instance can serve concurrent runs.
pub struct SqlAgent {
    graph: ExecutableGraph<AgentState>,
    retrieval: RetrievalClient,
    config: AgentConfig,
}

impl SqlAgent {
    pub fn builder() -> SqlAgentBuilder {
        SqlAgentBuilder::default()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The retrieval client the Explore stage uses, for direct schema lookups.
    pub fn retrieval(&self) -> &RetrievalClient {
        &self.retrieval
    }

    /// Runs the workflow to completion. Never fails: problems end up in
    /// `error_message` / `error_kind` of the returned state.
    pub async fn run(&self, input_query: &str) -> AgentState {
        let mut state = AgentState::new(input_query);
        if input_query.trim().is_empty() {
            state = AgentState::apply(&state, AgentStateUpdate::failed(StageFailure::InvalidInput));
        }

        tracing::debug!(query = %input_query, "agent run started");
        let state = match self.graph.invoke_graph(GraphState::new(state.clone())).await {
            Ok(final_state) => final_state.into_inner(),
            Err(err) => AgentState::apply(
                &state,
                AgentStateUpdate::failed(StageFailure::Workflow(err.to_string())),
            ),
        };

        match &state.error_message {
            Some(message) => tracing::info!(
                error_kind = ?state.error_kind,
                error = %message,
                tables = state.relevant_tables.len(),
                "agent run failed"
            ),
            None => tracing::info!(
                tables = state.relevant_tables.len(),
                rows = state.execution_result.as_ref().map_or(0, Vec::len),
                "agent run finished"
            ),
        }
        state
    }
}

#[derive(Default)]
pub struct SqlAgentBuilder {
    index: Option<Arc<dyn SchemaIndex>>,
    llm: Option<Arc<dyn Llm>>,
    executor: Option<Arc<dyn SqlExecutor>>,
    config: AgentConfig,
    observers: Vec<Arc<dyn Observer>>,
}

impl SqlAgentBuilder {
    pub fn index(mut self, index: Arc<dyn SchemaIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn executor(mut self, executor: Arc<dyn SqlExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<SqlAgent, ScoutError> {
        let index = self
            .index
            .ok_or_else(|| ScoutError::InvalidConfig("schema index is required".to_string()))?;
        let llm = self
            .llm
            .ok_or_else(|| ScoutError::InvalidConfig("llm is required".to_string()))?;
        let executor = self
            .executor
            .ok_or_else(|| ScoutError::InvalidConfig("sql executor is required".to_string()))?;
        if self.config.search_limit == 0 {
            return Err(ScoutError::InvalidConfig(
                "search_limit must be at least 1".to_string(),
            ));
        }
        if self.config.dialect.trim().is_empty() {
            return Err(ScoutError::InvalidConfig(
                "dialect cannot be empty".to_string(),
            ));
        }

        let retrieval = RetrievalClient::new(index);
        let generation =
            GenerationClient::new(llm, self.config.model.clone(), self.config.temperature);
        let execution = ExecutionClient::new(executor);

        let mut builder = GraphBuilder::<AgentState>::new()
            .add_node(Stage::Plan.name(), PlanNode::new(generation.clone()))
            .add_node(
                Stage::Explore.name(),
                ExploreNode::new(retrieval.clone(), self.config.search_limit),
            )
            .add_node(
                Stage::Generate.name(),
                GenerateNode::new(generation, self.config.dialect.clone()),
            )
            .add_node(Stage::Execute.name(), ExecuteNode::new(execution))
            .set_entry(Stage::Plan.name());
        for stage in Stage::PIPELINE {
            if stage.next() != Stage::Done {
                builder = builder.add_edge(stage.name(), stage.next().name());
            }
        }
        for observer in self.observers {
            builder = builder.with_observer(observer);
        }

        Ok(SqlAgent {
            graph: builder.build(),
            retrieval,
            config: self.config,
        })
    }
}
