use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use tablescout_agent::{AgentConfig, SqlAgent};
use tablescout_core::{Llm, SchemaSource, SqlExecutor};
use tablescout_executor::{HttpSqlExecutor, PostgresSqlExecutor};
use tablescout_llm::{OllamaClient, OpenAiCompatibleClient};
use tablescout_weaviate::{Vectorizer, WeaviateSchemaIndex};

/// Connection settings shared by every command. Each flag falls back to an
/// environment variable, and `.env` is loaded before parsing.
#[derive(Args)]
pub struct Settings {
    /// Weaviate endpoint holding the schema index
    #[arg(
        long,
        env = "WEAVIATE_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub weaviate_url: String,

    #[arg(long, env = "WEAVIATE_API_KEY", hide_env_values = true, global = true)]
    pub weaviate_api_key: Option<String>,

    /// Index class name
    #[arg(long, env = "TABLESCOUT_CLASS", default_value = "TableSchema", global = true)]
    pub class: String,

    /// Vectorizer module used when the index is rebuilt (`none` or `text2vec-openai`)
    #[arg(long, env = "TABLESCOUT_VECTORIZER", default_value = "none", global = true)]
    pub vectorizer: Vectorizer,

    /// Which chat backend generates keywords and SQL
    #[arg(
        long,
        env = "TABLESCOUT_LLM_PROVIDER",
        value_enum,
        default_value_t = LlmProvider::OpenAi,
        global = true
    )]
    pub llm_provider: LlmProvider,

    #[arg(
        long,
        env = "OPENAI_BASE_URL",
        default_value = "https://api.openai.com/v1",
        global = true
    )]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_MODEL_NAME", default_value = "gpt-4o", global = true)]
    pub model: String,

    #[arg(
        long,
        env = "OLLAMA_BASE_URL",
        default_value = "http://localhost:11434",
        global = true
    )]
    pub ollama_base_url: String,

    /// Postgres connection string; takes precedence over --executor-url
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    /// Executor service base URL
    #[arg(long, env = "EXECUTOR_URL", global = true)]
    pub executor_url: Option<String>,

    #[arg(long, env = "TABLESCOUT_SQL_DIALECT", default_value = "PostgreSQL", global = true)]
    pub dialect: String,

    #[arg(long, env = "TABLESCOUT_SEARCH_LIMIT", default_value_t = 5, global = true)]
    pub search_limit: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LlmProvider {
    #[value(name = "openai")]
    OpenAi,
    Ollama,
}

/// The configured SQL backend, usable both for execution and schema inspection.
pub enum Backend {
    Postgres(Arc<PostgresSqlExecutor>),
    Http(Arc<HttpSqlExecutor>),
}

impl Backend {
    pub fn executor(&self) -> Arc<dyn SqlExecutor> {
        match self {
            Backend::Postgres(executor) => executor.clone(),
            Backend::Http(executor) => executor.clone(),
        }
    }

    pub fn schema_source(&self) -> Arc<dyn SchemaSource> {
        match self {
            Backend::Postgres(executor) => executor.clone(),
            Backend::Http(executor) => executor.clone(),
        }
    }
}

impl Settings {
    pub fn index(&self) -> anyhow::Result<WeaviateSchemaIndex> {
        let mut builder = WeaviateSchemaIndex::builder()
            .base_url(&self.weaviate_url)
            .class_name(&self.class)
            .vectorizer(self.vectorizer);
        if let Some(api_key) = &self.weaviate_api_key {
            builder = builder.api_key(api_key);
        }
        builder.build().context("invalid weaviate settings")
    }

    pub fn llm(&self) -> anyhow::Result<Arc<dyn Llm>> {
        match self.llm_provider {
            LlmProvider::OpenAi => {
                let mut builder = OpenAiCompatibleClient::builder()
                    .base_url(&self.openai_base_url)?
                    .default_model(&self.model);
                if let Some(api_key) = &self.openai_api_key {
                    builder = builder.api_key(api_key);
                }
                Ok(Arc::new(builder.build()?))
            }
            LlmProvider::Ollama => Ok(Arc::new(OllamaClient::new(
                self.ollama_base_url.clone(),
                self.model.clone(),
            )?)),
        }
    }

    pub async fn backend(&self) -> anyhow::Result<Backend> {
        if let Some(database_url) = non_empty(&self.database_url) {
            let executor = PostgresSqlExecutor::builder(database_url)
                .build()
                .await
                .context("failed to connect to the database")?;
            return Ok(Backend::Postgres(Arc::new(executor)));
        }
        if let Some(executor_url) = non_empty(&self.executor_url) {
            return Ok(Backend::Http(Arc::new(HttpSqlExecutor::new(executor_url)?)));
        }
        bail!("no SQL backend configured: set DATABASE_URL or EXECUTOR_URL")
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            search_limit: self.search_limit,
            dialect: self.dialect.clone(),
            model: self.model.clone(),
            ..AgentConfig::default()
        }
    }

    pub async fn agent(&self) -> anyhow::Result<SqlAgent> {
        let backend = self.backend().await?;
        let agent = SqlAgent::builder()
            .index(Arc::new(self.index()?))
            .llm(self.llm()?)
            .executor(backend.executor())
            .config(self.agent_config())
            .build()?;
        Ok(agent)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}
