use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not a valid item list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains no items")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Input that arrived when the controller could not take it. The front end
/// drops these; they exist so callers and tests can see why nothing happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input not accepted while {phase}")]
    NotAccepting { phase: &'static str },

    #[error("slot {index} out of range (board has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("slot {index} is already face up")]
    SlotUnavailable { index: usize },

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no items available to start the game")]
    DataUnavailable,
}
