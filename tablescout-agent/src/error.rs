use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a stage failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    PlanningAdvisory,
    NoRelevantTablesFound,
    Retrieval,
    EmptyContext,
    Generation,
    Execution,
    Workflow,
}

/// A failure produced by one workflow stage.
///
/// The `Display` text is what ends up in `AgentState::error_message`.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageFailure {
    #[error("Input query is empty.")]
    InvalidInput,
    #[error("Planning failed: {0}")]
    Planning(String),
    #[error("No relevant tables found.")]
    NoRelevantTablesFound,
    #[error("Explorer failed: {0}")]
    Retrieval(String),
    #[error("No context available to generate SQL.")]
    EmptyContext,
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Execution failed: {0}")]
    Execution(String),
    #[error("Workflow failed: {0}")]
    Workflow(String),
}

impl StageFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            StageFailure::InvalidInput => FailureKind::InvalidInput,
            StageFailure::Planning(_) => FailureKind::PlanningAdvisory,
            StageFailure::NoRelevantTablesFound => FailureKind::NoRelevantTablesFound,
            StageFailure::Retrieval(_) => FailureKind::Retrieval,
            StageFailure::EmptyContext => FailureKind::EmptyContext,
            StageFailure::Generation(_) => FailureKind::Generation,
            StageFailure::Execution(_) => FailureKind::Execution,
            StageFailure::Workflow(_) => FailureKind::Workflow,
        }
    }

    /// Fatal failures halt the workflow; planning failures are only logged.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StageFailure::Planning(_))
    }
}
