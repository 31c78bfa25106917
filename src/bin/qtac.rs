//! qtac CLI - tabular Q-learning for Tic-Tac-Toe
//!
//! Provides a unified interface for:
//! - Training the agent and persisting its value table
//! - Evaluating a saved table with greedy play
//! - Rendering the table as a static HTML report

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qtac")]
#[command(version, about = "Tabular Q-learning Tic-Tac-Toe agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent against a random opponent
    Train(qtac::cli::commands::train::TrainArgs),

    /// Evaluate a trained agent
    Evaluate(qtac::cli::commands::evaluate::EvaluateArgs),

    /// Render the saved value table as an HTML report
    Report(qtac::cli::commands::report::ReportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qtac::cli::commands::train::execute(args),
        Commands::Evaluate(args) => qtac::cli::commands::evaluate::execute(args),
        Commands::Report(args) => qtac::cli::commands::report::execute(args),
    }
}
