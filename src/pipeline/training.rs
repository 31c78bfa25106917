//! Episode loop driving the agent's learning

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::opponents::RandomOpponent;
use crate::{
    agent::QAgent,
    error::Result,
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes to play
    pub num_games: usize,

    /// Which token the agent controls
    pub agent_player: Player,

    /// Which token opens each game
    pub first_player: Player,

    /// Show a progress bar while playing
    pub progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_games: 500,
            agent_player: Player::X,
            first_player: Player::X,
            progress: false,
        }
    }
}

/// Result of a training or evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl TrainingResult {
    pub fn new(total_games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |n: usize| {
            if total_games > 0 {
                n as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }

    /// Save result to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Plays episodes between the agent and an opponent.
///
/// During training every agent move produces one online Bellman update. The
/// successor fed to the learner is the next state where the agent is to move
/// again (i.e. after the opponent's reply), or the terminal state; rewards
/// are zero everywhere except terminal transitions.
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Train the agent for the configured number of episodes.
    ///
    /// Exploration decays once per completed episode.
    ///
    /// # Errors
    ///
    /// Returns an error on a rules violation in an episode or a broken
    /// progress-bar template.
    pub fn run(&self, agent: &mut QAgent, opponent: &mut RandomOpponent) -> Result<TrainingResult> {
        self.play_games(agent, opponent, true)
    }

    /// Play evaluation games: greedy action selection, no learning, no decay.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`run`](Self::run).
    pub fn evaluate(
        &self,
        agent: &mut QAgent,
        opponent: &mut RandomOpponent,
    ) -> Result<TrainingResult> {
        self.play_games(agent, opponent, false)
    }

    fn play_games(
        &self,
        agent: &mut QAgent,
        opponent: &mut RandomOpponent,
        learn: bool,
    ) -> Result<TrainingResult> {
        let progress = self.make_progress_bar()?;

        let mut wins = 0;
        let mut draws = 0;
        let mut losses = 0;

        for game_num in 0..self.config.num_games {
            let outcome = self.play_episode(agent, opponent, learn)?;

            match outcome {
                GameOutcome::Win(winner) if winner == self.config.agent_player => wins += 1,
                GameOutcome::Win(_) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }

            if learn {
                agent.decay_exploration();
            }

            if let Some(pb) = &progress {
                pb.set_position((game_num + 1) as u64);
                pb.set_message(format!("W:{wins} D:{draws} L:{losses}"));
            }
        }

        if let Some(pb) = &progress {
            pb.finish_with_message(format!("W:{wins} D:{draws} L:{losses}"));
        }

        Ok(TrainingResult::new(self.config.num_games, wins, draws, losses))
    }

    fn make_progress_bar(&self) -> Result<Option<ProgressBar>> {
        if !self.config.progress {
            return Ok(None);
        }

        let pb = ProgressBar::new(self.config.num_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        Ok(Some(pb))
    }

    fn play_episode(
        &self,
        agent: &mut QAgent,
        opponent: &mut RandomOpponent,
        learn: bool,
    ) -> Result<GameOutcome> {
        let mut state = BoardState::new_with_player(self.config.first_player);

        while !state.is_terminal() {
            if state.to_move != self.config.agent_player {
                let reply = opponent.select_move(&state)?;
                state = state.make_move(reply)?;
                continue;
            }

            let key = state.key();
            let legal = state.legal_moves();
            let action = agent.choose_action(&key, &legal, learn)?;
            let mut next = state.make_move(action)?;

            // Step past the opponent's reply so the successor is the next
            // state where the agent decides again.
            if !next.is_terminal() {
                let reply = opponent.select_move(&next)?;
                next = next.make_move(reply)?;
            }

            if learn {
                let done = next.is_terminal();
                let reward = GameOutcome::from_state(&next)
                    .map(|outcome| outcome.reward_for(self.config.agent_player))
                    .unwrap_or(0.0);
                agent.update(&key, action, reward, &next.key(), &next.legal_moves(), done);
            }

            state = next;
        }

        // Terminal state always has an outcome.
        GameOutcome::from_state(&state).ok_or(crate::Error::GameOver)
    }
}
