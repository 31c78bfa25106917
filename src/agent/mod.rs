//! The Value-Table Agent: policy, learner, and persistence
//!
//! The three pieces share one mutable [`QTable`]: the policy reads and lazily
//! seeds it, the learner writes Bellman backups into it, and the persistence
//! layer carries it across runs as a JSON document.

pub mod persistence;
pub mod q_agent;
pub mod q_table;

pub use persistence::TableDocument;
pub use q_agent::{QAgent, QAgentConfig};
pub use q_table::QTable;
