//! Game outcomes and the reward signal they produce

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Player};

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Read the outcome off a terminal board, `None` when the game is still on.
    pub fn from_state(state: &BoardState) -> Option<GameOutcome> {
        if let Some(winner) = state.winner() {
            Some(GameOutcome::Win(winner))
        } else if state.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Scalar reward for the given player: +1.0 win, -1.0 loss, +0.5 draw.
    pub fn reward_for(self, player: Player) -> f64 {
        match self {
            GameOutcome::Win(winner) if winner == player => 1.0,
            GameOutcome::Win(_) => -1.0,
            GameOutcome::Draw => 0.5,
        }
    }
}
