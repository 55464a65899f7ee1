mod error;
mod llm;
mod runnable;
mod schema;
mod schema_index;
mod sql_executor;
pub mod state;
mod value;

pub use error::{ExecutionError, IndexError, ScoutError};
pub use llm::{Llm, LlmRequest, LlmResponse, Message, Role};
pub use runnable::Runnable;
pub use schema::{ColumnMetadata, ForeignKeyMetadata, TableMetadata};
pub use schema_index::{DdlLookup, SchemaIndex, TableHit, TableNeighbor};
pub use sql_executor::{Row, SchemaSource, SqlExecutor};
pub use state::{GraphState, StateSchema, StateUpdate};
pub use value::Value;
