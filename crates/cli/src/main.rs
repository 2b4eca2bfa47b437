//! Newsdesk CLI — the main entry point.
//!
//! Commands:
//! - `monitor` — Build today's briefing from collected snapshots
//! - `query`   — Search the knowledge base
//! - `context` — Assemble a drafting context bundle for a briefing
//! - `status`  — Show configuration and store counts

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "newsdesk",
    about = "Newsdesk — media briefing and drafting-context pipeline",
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
    /// Build a dated briefing from snapshot files in the inbox
    Monitor {
        /// Override the snapshot inbox directory
        #[arg(long)]
        inbox: Option<PathBuf>,

        /// Write the briefing to this path instead of the research directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Briefing date (defaults to today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },

    /// Search the knowledge base
    Query {
        /// Keywords to search for
        #[arg(short, long, num_args = 1..)]
        keywords: Vec<String>,

        /// Restrict to these categories
        #[arg(short, long)]
        category: Vec<String>,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Look up a single entry by id instead of searching
        #[arg(long, conflicts_with = "keywords")]
        id: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assemble a drafting context bundle for a briefing
    Context {
        /// Path to the briefing JSON file
        #[arg(short, long)]
        briefing: PathBuf,

        /// Override the output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write the rendered prompt text to this path
        #[arg(long)]
        prompt_out: Option<PathBuf>,
    },

    /// Show configuration and store counts
    Status,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
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
        Commands::Monitor {
            inbox,
            output,
            date,
        } => commands::monitor::run(inbox, output, date)?,
        Commands::Query {
            keywords,
            category,
            limit,
            id,
            json,
        } => commands::query::run(keywords, category, limit, id, json)?,
        Commands::Context {
            briefing,
            output_dir,
            prompt_out,
        } => commands::context::run(&briefing, output_dir, prompt_out)?,
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}
