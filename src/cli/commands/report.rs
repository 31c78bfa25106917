//! Report command - render the saved table as a static HTML page

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::output::{print_kv, print_section};

#[derive(Parser, Debug)]
#[command(about = "Render a saved value table as an HTML report")]
pub struct ReportArgs {
    /// Path of the persisted value table
    #[arg(long, short = 'b', default_value = "brain.json")]
    pub brain: PathBuf,

    /// Output HTML file
    #[arg(long, short = 'o', default_value = "report.html")]
    pub output: PathBuf,
}

pub fn execute(args: ReportArgs) -> Result<()> {
    let summary = crate::report::generate(&args.brain, &args.output)
        .with_context(|| format!("failed to render report from {}", args.brain.display()))?;

    print_section("Report generated");
    print_kv("States", &summary.states.to_string());
    print_kv("Winning states", &summary.winning_states.to_string());
    print_kv("Error states", &summary.error_states.to_string());
    print_kv("Written to", &args.output.display().to_string());

    Ok(())
}
