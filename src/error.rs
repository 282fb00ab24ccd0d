//! Error types
//!
//! Only `InvalidTuning` is fatal. Everything else is reported by the
//! collaborator that failed and logged by the game loop, which keeps going.

use thiserror::Error;

/// Errors surfaced by the game core and its collaborators
#[derive(Error, Debug)]
pub enum GameError {
    /// Tuning values that would break simulation invariants
    #[error("Invalid tuning: {message}")]
    InvalidTuning { message: String },

    /// An audio or visual asset could not be loaded
    #[error("Resource missing: {name}")]
    ResourceMissing { name: String },

    /// Settings or score store I/O error
    #[error("Persistence I/O error: {0}")]
    PersistenceIo(#[from] std::io::Error),

    /// Settings or score store (de)serialization error
    #[error("Persistence serialization error: {0}")]
    PersistenceSerialization(#[from] serde_json::Error),
}

impl GameError {
    pub fn invalid_tuning(message: impl Into<String>) -> Self {
        Self::InvalidTuning {
            message: message.into(),
        }
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
