//! Error types for the qtac crate

use thiserror::Error;

/// Main error type for the qtac crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("game already over")]
    GameOver,

    #[error("no legal actions available for action selection")]
    NoLegalActions,

    #[error("malformed state key '{key}' (expected format: {expected})")]
    MalformedStateKey { key: String, expected: String },

    #[error("state key has {got} cells, expected {expected} in '{context}'")]
    InvalidKeyLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid marker '{marker}' at cell {position} in '{context}'")]
    InvalidMarker {
        marker: String,
        position: usize,
        context: String,
    },

    #[error("invalid action key '{key}' (expected a decimal position 0-{max})")]
    InvalidActionKey { key: String, max: usize },

    #[error("non-finite value {value} for state '{state}', action {action}")]
    NonFiniteValue {
        state: String,
        action: usize,
        value: f64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
