//! Tabular Q-learning agent for Tic-Tac-Toe
//!
//! This crate provides:
//! - A value-table agent: ε-greedy policy, one-step Q-learning updates, and
//!   per-episode exploration decay
//! - A durable, human-inspectable JSON format for the learned table
//! - A Tic-Tac-Toe game engine used as the training environment
//! - A training/evaluation pipeline and a static HTML report generator

pub mod agent;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod tictactoe;
pub mod types;

pub use agent::{QAgent, QAgentConfig, QTable, TableDocument};
pub use error::{Error, Result};
pub use types::StateKey;
