//! Error types for the fallible edges of the game: configuration and
//! high-score storage. The simulation itself never fails.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt high score record: {0:?}")]
    Corrupt(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
