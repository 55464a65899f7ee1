use serde::{Deserialize, Serialize};
use tablescout_core::{Row, StateSchema};
use tablescout_graph::{AppendVec, OverrideOption};

use crate::{FailureKind, StageFailure};

/// A retrieved table, reduced to what SQL generation needs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub ddl_minimal: String,
}

/// Scratchpad carried through one agent run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub input_query: String,
    pub relevant_tables: Vec<TableRef>,
    pub reasoning_log: Vec<String>,
    pub sql_query: Option<String>,
    pub execution_result: Option<Vec<Row>>,
    pub error_message: Option<String>,
    pub error_kind: Option<FailureKind>,
}

impl AgentState {
    pub fn new(input_query: impl Into<String>) -> Self {
        Self {
            input_query: input_query.into(),
            ..Self::default()
        }
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    /// True when the run produced rows and recorded no error.
    pub fn is_success(&self) -> bool {
        self.execution_result.is_some() && self.error_message.is_none()
    }
}

/// Partial update returned by a stage. Has no `input_query` field, so stages
/// cannot rewrite the request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStateUpdate {
    pub relevant_tables: Option<Vec<TableRef>>,
    pub reasoning_log: Vec<String>,
    pub sql_query: Option<String>,
    pub execution_result: Option<Vec<Row>>,
    pub failure: Option<StageFailure>,
}

impl AgentStateUpdate {
    pub fn log(entry: impl Into<String>) -> Self {
        Self {
            reasoning_log: vec![entry.into()],
            ..Self::default()
        }
    }

    pub fn failed(failure: StageFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl StateSchema for AgentState {
    type Update = AgentStateUpdate;

    fn apply(current: &Self, update: AgentStateUpdate) -> Self {
        // The first fatal failure sticks; non-fatal ones only reach the log.
        let (error_message, error_kind) = match update.failure {
            Some(failure) if failure.is_fatal() && current.error_message.is_none() => {
                (Some(failure.to_string()), Some(failure.kind()))
            }
            _ => (current.error_message.clone(), current.error_kind),
        };

        AgentState {
            input_query: current.input_query.clone(),
            relevant_tables: update
                .relevant_tables
                .unwrap_or_else(|| current.relevant_tables.clone()),
            reasoning_log: AppendVec::merge(&current.reasoning_log, update.reasoning_log),
            sql_query: OverrideOption::merge(&current.sql_query, update.sql_query),
            execution_result: OverrideOption::merge(
                &current.execution_result,
                update.execution_result,
            ),
            error_message,
            error_kind,
        }
    }

    fn is_halted(&self) -> bool {
        self.has_error()
    }
}
