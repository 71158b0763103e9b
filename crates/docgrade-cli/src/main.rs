//! docgrade command line interface.
//!
//! Exposes the evaluation operation over files: read a code file and
//! a doc file, run one evaluation, print the result as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docgrade_core::EvaluationInput;
use docgrade_runtime::{Orchestrator, RuntimeConfig};

#[derive(Parser)]
#[command(name = "docgrade", version, about = "Score generated documentation against its source code")]
struct Cli {
    /// Path to a YAML runtime configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one code/doc pair
    Evaluate {
        /// File containing the source code
        #[arg(long)]
        code: PathBuf,

        /// File containing the generated documentation
        #[arg(long)]
        doc: PathBuf,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Bad configuration is fatal before any work is scheduled.
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    match cli.command {
        Command::Evaluate { code, doc, pretty } => {
            let code_text = std::fs::read_to_string(&code)
                .with_context(|| format!("reading code from {}", code.display()))?;
            let doc_text = std::fs::read_to_string(&doc)
                .with_context(|| format!("reading doc from {}", doc.display()))?;

            let orchestrator = Orchestrator::from_config(config)?;
            tracing::info!(judges = ?orchestrator.judge_ids(), "assembled judge set");

            let input = EvaluationInput::new(code_text, doc_text);

            let result = orchestrator.evaluate(&input).await?;

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
