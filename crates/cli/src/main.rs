//! `pipeline` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate` — check a pipeline JSON file and print its execution order.
//! - `run`      — execute a pipeline JSON file with the built-in nodes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{ExecutorConfig, NodeRegistry, Pipeline, PipelineExecutor};
use nodes::PipelineContext;
use storage::MemoryStorage;

#[derive(Parser)]
#[command(name = "pipeline", about = "Dataflow pipeline engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a pipeline definition JSON file.
    Validate {
        /// Path to the pipeline JSON file.
        path: PathBuf,
    },
    /// Run a pipeline definition and print the result as JSON.
    Run {
        /// Path to the pipeline JSON file.
        path: PathBuf,
        /// JSON object used to seed the in-memory storage.
        #[arg(long, env = "PIPELINE_STORAGE")]
        storage: Option<PathBuf>,
        /// Log each node's input and output at debug level.
        #[arg(long, env = "PIPELINE_LOG_PAYLOADS")]
        log_payloads: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli.command).await {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Validate { path } => {
            let pipeline = read_pipeline(&path)?;
            let order = engine::validate_pipeline(&pipeline)?;
            println!("✅ Pipeline is valid. Execution order: {order:?}");
        }
        Command::Run { path, storage, log_payloads } => {
            let pipeline = read_pipeline(&path)?;

            let store = match storage {
                Some(seed) => {
                    info!("Seeding storage from {}", seed.display());
                    MemoryStorage::from_value(read_json(&seed)?)?
                }
                None => MemoryStorage::new(),
            };
            let store = Arc::new(store);

            let executor = PipelineExecutor::new(
                NodeRegistry::with_builtins(),
                ExecutorConfig { log_payloads },
            );
            let mut ctx = PipelineContext::new(store.clone());

            let result = executor.execute(&pipeline, &mut ctx).await?;

            let report = json!({
                "result": result,
                "storage": store.snapshot().await,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn read_pipeline(path: &Path) -> Result<Pipeline> {
    serde_json::from_value(read_json(path)?)
        .with_context(|| format!("{} is not a valid pipeline definition", path.display()))
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
