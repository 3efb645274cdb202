/// High-score persistence contract and its two stores.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub trait HighScoreStore {
    /// Previously saved high score; `0` when nothing was saved yet.
    fn load(&mut self) -> Result<u32, StoreError>;
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Plain-text file holding a single integer.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.space_invaders_score`, or the working directory without a home.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".space_invaders_score")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<u32, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| StoreError::Corrupt(trimmed.to_string()))
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        std::fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}

/// In-memory store; counts writes so tests can assert on them.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub score: u32,
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_score(score: u32) -> Self {
        Self { score, saves: 0 }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.score = score;
        self.saves += 1;
        Ok(())
    }
}
