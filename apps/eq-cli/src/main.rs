//! # eq-cli
//!
//! Command-line interface for Eternal Quest.
//!
//! - `quest goal add/list/show/record/delete` — manage goals and record progress
//! - `quest stats` — total points, level and goal counts

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eq_goal::QuestConfig;
use tracing_subscriber::EnvFilter;

/// Eternal Quest: set goals, record progress and earn points.
#[derive(Parser)]
#[command(name = "quest", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Show score, level and goal counts.
    Stats,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't mix with command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("eq_goal=warn".parse()?)
                .add_directive("quest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = QuestConfig::for_project(&project_root);
    let mut store = commands::open_store(&config);

    match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &mut store),
        Commands::Stats => commands::stats::execute(&store),
    }
}
