//! Opponents for training and evaluation games

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{error::Result, tictactoe::BoardState};

/// Opponent that plays a uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create an opponent with a deterministic seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a move for the given state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state has no legal moves.
    pub fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(crate::Error::NoLegalActions);
        }
        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}
