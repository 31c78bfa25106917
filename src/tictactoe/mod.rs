//! Tic-Tac-Toe game rules
//!
//! The agent core treats this module as an external collaborator: it supplies
//! board states, legal moves, terminal flags, and rewards, and implements no
//! learning logic of its own.

pub mod board;
pub mod game;
pub mod lines;

pub use board::{BoardState, Cell, Player};
pub use game::GameOutcome;
