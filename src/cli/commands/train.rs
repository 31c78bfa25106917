//! Train command - run episodes against a random opponent and save the table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::parse_player_token;
use crate::{
    agent::{QAgent, QAgentConfig},
    cli::output::{format_rate, print_kv, print_section},
    pipeline::{RandomOpponent, TrainingConfig, TrainingPipeline, TrainingResult},
};

#[derive(Parser, Debug)]
#[command(about = "Train the agent against a random opponent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training games
    #[arg(long, short = 'g', default_value_t = 5000)]
    pub games: usize,

    /// Path of the persisted value table
    #[arg(long, short = 'b', default_value = "brain.json")]
    pub brain: PathBuf,

    /// Learning rate alpha
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor gamma
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Initial exploration rate epsilon
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Multiplicative epsilon decay per episode
    #[arg(long, default_value_t = 0.9995)]
    pub epsilon_decay: f64,

    /// Exploration floor
    #[arg(long, default_value_t = 0.01)]
    pub epsilon_min: f64,

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
    #[arg(long, default_value_t = true)]
    pub progress: bool,

    /// Ignore an existing brain file and start from an empty table
    #[arg(long, default_value_t = false)]
    pub fresh: bool,

    /// Optional path for a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    games: usize,
    alpha: f64,
    gamma: f64,
    epsilon_decay: f64,
    epsilon_min: f64,
    final_epsilon: f64,
    states_known: usize,
    agent_player: String,
    first_player: String,
    seed: Option<u64>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let agent_player = parse_player_token(&args.agent_player, "--agent-player")?;
    let first_player = parse_player_token(&args.first_player, "--first-player")?;

    let config = QAgentConfig::default()
        .with_alpha(args.alpha)
        .with_gamma(args.gamma)
        .with_epsilon(args.epsilon)
        .with_epsilon_decay(args.epsilon_decay)
        .with_epsilon_min(args.epsilon_min);

    let mut agent = if args.fresh {
        QAgent::new(config)?
    } else {
        QAgent::load_or_fresh(config, &args.brain)?
    };

    if agent.states_known() > 0 {
        println!(
            "Loaded {} known states from {}; exploration disabled for this run (use --fresh to retrain from scratch).",
            agent.states_known(),
            args.brain.display()
        );
    } else {
        println!("No prior table found; starting from scratch.");
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

    let result = pipeline.run(&mut agent, &mut opponent)?;

    agent
        .save(&args.brain)
        .with_context(|| format!("failed to save value table to {}", args.brain.display()))?;

    print_section("Training complete");
    print_kv("Games", &result.total_games.to_string());
    print_kv("Wins", &format!("{} ({})", result.wins, format_rate(result.win_rate)));
    print_kv("Draws", &format!("{} ({})", result.draws, format_rate(result.draw_rate)));
    print_kv("Losses", &format!("{} ({})", result.losses, format_rate(result.loss_rate)));
    print_kv("States known", &agent.states_known().to_string());
    print_kv("Final epsilon", &format!("{:.4}", agent.epsilon()));
    print_kv("Saved to", &args.brain.display().to_string());

    if let Some(summary_path) = &args.summary {
        let summary = TrainingSummaryFile {
            metadata: SummaryMetadata {
                games: args.games,
                alpha: args.alpha,
                gamma: args.gamma,
                epsilon_decay: args.epsilon_decay,
                epsilon_min: args.epsilon_min,
                final_epsilon: agent.epsilon(),
                states_known: agent.states_known(),
                agent_player: agent_player.to_string(),
                first_player: first_player.to_string(),
                seed: args.seed,
            },
            training: result,
        };
        let file = std::fs::File::create(summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        print_kv("Summary", &summary_path.display().to_string());
    }

    Ok(())
}
