//! marketmind CLI — the main entry point.
//!
//! Commands:
//! - `run`   — Run one agent turn over a user message
//! - `tools` — List the registered tools

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "marketmind",
    about = "marketmind — a three-tool conversational agent",
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
    /// Run one agent turn over a user message
    Run {
        /// The user message to process
        #[arg(short, long)]
        message: String,

        /// Override the stock data directory
        #[arg(long)]
        data_dir: Option<std::path::PathBuf>,
    },

    /// List the registered tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { message, data_dir } => commands::run::run(message, data_dir).await?,
        Commands::Tools => commands::tools::run()?,
    }

    Ok(())
}
