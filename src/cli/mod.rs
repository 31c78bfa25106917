//! CLI infrastructure for the qtac trainer
//!
//! Subcommands for training the agent, evaluating a saved table, and
//! rendering the HTML report.

pub mod commands;
pub mod output;
