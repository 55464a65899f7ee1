//! TableScout CLI: ask questions of a database in plain language.
//!
//! Usage:
//!   tablescout ask <question...>
//!   tablescout search <query...> [--limit <n>]
//!   tablescout ddl <table>... [--raw]
//!   tablescout neighbors <table>
//!   tablescout samples <table> <column> [--limit <n>]
//!   tablescout sync

mod settings;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tablescout_core::{SchemaIndex, SchemaSource};
use tablescout_executor::{column_samples, DEFAULT_SAMPLE_LIMIT};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "tablescout")]
#[command(about = "Natural-language to SQL over a semantically indexed schema")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full agent and print the final state as JSON
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Hybrid search over the schema index
    Search {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Print the stored DDL of one or more tables
    Ddl {
        #[arg(required = true)]
        tables: Vec<String>,

        /// Print the full CREATE TABLE statement instead of the minimal form
        #[arg(long)]
        raw: bool,
    },

    /// List the tables a table references
    Neighbors { table: String },

    /// Print sample values of one column
    Samples {
        table: String,
        column: String,

        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
        limit: usize,
    },

    /// Inspect the database and rebuild the schema index from scratch
    Sync,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Commands::Ask { question } => {
            let agent = settings.agent().await?;
            let state = agent.run(&question.join(" ")).await;
            print_json(&state)?;
            if state.error_message.is_some() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Search { query, limit } => {
            let hits = settings.index()?.search(&query.join(" "), limit).await?;
            print_json(&hits)?;
        }
        Commands::Ddl { tables, raw } => {
            let ddl = settings.index()?.table_ddl(&tables, !raw).await?;
            print_json(&ddl)?;
        }
        Commands::Neighbors { table } => {
            let neighbors = settings.index()?.neighbors(&table).await?;
            print_json(&neighbors)?;
        }
        Commands::Samples {
            table,
            column,
            limit,
        } => {
            let backend = settings.backend().await?;
            let values = column_samples(backend.executor().as_ref(), &table, &column, limit).await?;
            print_json(&values)?;
        }
        Commands::Sync => {
            let backend = settings.backend().await?;
            let tables = backend.schema_source().inspect_schema().await?;
            tracing::info!(tables = tables.len(), "inspected database schema");
            let report = settings.index()?.rebuild(&tables).await?;
            print_json(&report)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
