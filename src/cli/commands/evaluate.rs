//! Evaluate command - play greedy games from a saved table

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::parse_player_token;
use crate::{
    agent::{QAgent, QAgentConfig},
    cli::output::{format_rate, print_kv, print_section},
    pipeline::{RandomOpponent, TrainingConfig, TrainingPipeline},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent against a random opponent")]
pub struct EvaluateArgs {
    /// Path of the persisted value table
    #[arg(long, short = 'b', default_value = "brain.json")]
    pub brain: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which token the agent controls (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub agent_player: String,

    /// Which token makes the first move (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub first_player: String,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let agent_player = parse_player_token(&args.agent_player, "--agent-player")?;
    let first_player = parse_player_token(&args.first_player, "--first-player")?;

    let mut agent = QAgent::load_or_fresh(QAgentConfig::default(), &args.brain)?;
    if agent.states_known() == 0 {
        eprintln!(
            "warning: no learned table at {}; evaluating an untrained agent",
            args.brain.display()
        );
    }
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }
    let mut opponent = match args.seed {
        Some(seed) => RandomOpponent::with_seed(seed.wrapping_add(1)),
        None => RandomOpponent::new(),
    };

    let pipeline = TrainingPipeline::new(TrainingConfig {
        num_games: args.games,
        agent_player,
        first_player,
        progress: args.progress,
    });

    let result = pipeline.evaluate(&mut agent, &mut opponent)?;

    print_section("Evaluation");
    print_kv("Games", &result.total_games.to_string());
    print_kv("Wins", &format!("{} ({})", result.wins, format_rate(result.win_rate)));
    print_kv("Draws", &format!("{} ({})", result.draws, format_rate(result.draw_rate)));
    print_kv("Losses", &format!("{} ({})", result.losses, format_rate(result.loss_rate)));
    print_kv("States known", &agent.states_known().to_string());

    Ok(())
}
