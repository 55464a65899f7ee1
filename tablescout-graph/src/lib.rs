mod config;
mod error;
mod graph;
mod observer;
mod reducer;

pub use config::{ExecutionConfig, ExecutionOptions};
pub use error::GraphError;
pub use graph::{ExecutableGraph, GraphBuilder};
pub use observer::Observer;
pub use reducer::{AppendVec, OverrideOption};
pub use tablescout_core::{GraphState, StateSchema, StateUpdate};
