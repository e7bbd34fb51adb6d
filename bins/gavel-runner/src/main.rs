mod commands;
mod config;
mod engine;
mod evaluator;
mod executor;
mod extractor;
mod inference;
mod report;
mod scaffold;

use clap::{Parser, Subcommand};
use executor::RunOptions;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "gavel")]
#[command(about = "Gavel - extract example fixtures and judge candidate solutions against them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fixtures from a saved problem statement and scaffold solutions
    Extract {
        /// Path to the saved problem statement (HTML or plain text)
        source: PathBuf,

        /// Problem name (defaults to the source file stem)
        #[arg(short, long)]
        problem: Option<String>,

        /// Directory to create the problem folder in
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Function name used in the generated solution templates
        #[arg(short, long, default_value = "solve")]
        function: String,
    },

    /// Run a solution against its stored fixtures
    Run {
        /// Path to the solution file (its directory holds the fixture store)
        solution: PathBuf,

        /// Language profile table (defaults to config/languages.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Per-fixture time limit in milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,
    },

    /// Run a solution against one ad-hoc fixture
    Manual {
        /// Path to the solution file
        solution: PathBuf,

        /// Comma-separated input values, e.g. '[1,2,3], "s", 42'
        #[arg(short, long)]
        input: String,

        /// Expected output
        #[arg(short, long)]
        expected: String,

        /// Language profile table (defaults to config/languages.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Per-fixture time limit in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List configured language profiles
    Languages {
        /// Language profile table (defaults to config/languages.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Ctrl-C requests cancellation; the fixture loop observes the flag
    // between fixtures, so the current child is still fully awaited.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("received shutdown signal, finishing current fixture");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let run_id = Uuid::new_v4();
    info!(%run_id, "gavel starting");

    let opts = RunOptions {
        timeout_ms: None,
        cancel,
    };

    match cli.command {
        Commands::Extract {
            source,
            problem,
            out_dir,
            function,
        } => {
            commands::extract(&source, problem.as_deref(), &out_dir, &function).await?;
        }
        Commands::Run {
            solution,
            config,
            timeout_ms,
        } => {
            commands::run(&solution, config.as_deref(), timeout_ms, opts).await?;
        }
        Commands::Manual {
            solution,
            input,
            expected,
            config,
            timeout_ms,
        } => {
            commands::manual(
                &solution,
                &input,
                &expected,
                config.as_deref(),
                timeout_ms,
                opts,
            )
            .await?;
        }
        Commands::Languages { config } => {
            commands::languages(config.as_deref())?;
        }
    }

    Ok(())
}
