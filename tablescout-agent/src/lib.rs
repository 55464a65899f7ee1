//! The TableScout agent: turns a natural-language request into executed SQL
//! by planning, retrieving table schemas, generating SQL and running it.

mod agent;
mod clients;
mod config;
mod error;
pub mod prompts;
mod stages;
mod state;

pub use agent::{SqlAgent, SqlAgentBuilder};
pub use clients::{ExecutionClient, GenerationClient, RetrievalClient};
pub use config::{AgentConfig, DEFAULT_DIALECT, DEFAULT_SEARCH_LIMIT};
pub use error::{FailureKind, StageFailure};
pub use stages::{ExecuteNode, ExploreNode, GenerateNode, PlanNode, Stage};
pub use state::{AgentState, AgentStateUpdate, TableRef};
