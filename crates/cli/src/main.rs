//! Padhai CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Create the config directory and a default config
//! - `gateway`  — Start the HTTP API and UI
//! - `register` — Register a student from the terminal
//! - `ask`      — Send one query through the dispatcher
//! - `status`   — Show the effective configuration
//! - `doctor`   — Diagnose config, key, and store

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "padhai",
    about = "Padhai — a multi-agent AI tutor",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Register a student and print the new id
    Register {
        #[arg(long)]
        name: String,
        /// Class or grade, e.g. "8th"
        #[arg(long)]
        standard: String,
        #[arg(long)]
        subject: String,
        /// How the student likes to study
        #[arg(long)]
        like_study: String,
    },

    /// Ask a single question as a registered student
    Ask {
        /// Student id returned by `register` or POST /initialize
        #[arg(short, long)]
        student: String,

        /// Explanation tone: funny, serious, enthusiastic, casual, dramatic
        #[arg(short, long)]
        tone: Option<String>,

        /// The question
        query: String,
    },

    /// Show system status
    Status,

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Register {
            name,
            standard,
            subject,
            like_study,
        } => commands::register::run(name, standard, subject, like_study).await?,
        Commands::Ask {
            student,
            tone,
            query,
        } => commands::ask::run(student, tone, query).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
