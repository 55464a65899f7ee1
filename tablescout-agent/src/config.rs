use serde::{Deserialize, Serialize};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_DIALECT: &str = "PostgreSQL";

/// Tunables for one [`crate::SqlAgent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum number of tables requested from the schema index.
    pub search_limit: usize,
    pub dialect: String,
    /// Empty means the LLM client's default model.
    pub model: String,
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            dialect: DEFAULT_DIALECT.to_string(),
            model: String::new(),
            temperature: 0.0,
        }
    }
}
