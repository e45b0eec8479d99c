//! Coralink CLI — the main entry point.
//!
//! Commands:
//! - `run`    — Connect to the orchestration endpoint and serve forever
//! - `solve`  — Answer a problem with the local solver (no connection)
//! - `doctor` — Validate the environment without connecting

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "coralink",
    about = "Coralink — economics tutor agent for Coral-style orchestration servers",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the orchestration endpoint and run the agent loop
    Run,

    /// Solve a single problem locally and print the answer
    Solve {
        /// The problem text
        #[arg(short, long)]
        problem: String,
    },

    /// Check configuration and report what is set or missing
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => commands::run::run().await?,
        Commands::Solve { problem } => commands::solve::run(&problem)?,
        Commands::Doctor => commands::doctor::run()?,
    }

    Ok(())
}
