//! Training and evaluation driver
//!
//! Pure glue around the agent's public operations: plays episodes against an
//! opponent, feeds transitions to the learner, and decays exploration once
//! per episode.

pub mod opponents;
pub mod training;

pub use opponents::RandomOpponent;
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};
