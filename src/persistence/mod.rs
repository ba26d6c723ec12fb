//! Score persistence and file loading errors
//!
//! The game only hands `{name, score}` to a [`ScoreStore`] and reads an
//! ordered top-N list back. Storage and ranking belong to the store.

pub mod file;

pub use file::JsonFileStore;

use thiserror::Error;

use crate::highscores::{HighScoreEntry, HighScores};

/// Failures at the I/O boundary
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("a name is required")]
    NameRequired,
    #[error("score {0} does not make the leaderboard")]
    NotQualifying(u64),
}

/// Trim a submitted name, rejecting blank ones
pub fn normalize_name(name: &str) -> Result<String, PersistError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PersistError::NameRequired);
    }
    Ok(name.to_string())
}

/// Storage for finished runs
pub trait ScoreStore {
    /// Record a run. Returns the rank it reached (1-indexed).
    fn submit(&mut self, name: &str, score: u64) -> Result<usize, PersistError>;

    /// The best `n` runs, highest first
    fn top(&self, n: usize) -> Result<Vec<HighScoreEntry>, PersistError>;
}

/// Insert into a leaderboard with name validation
pub(crate) fn submit_to(
    scores: &mut HighScores,
    name: &str,
    score: u64,
) -> Result<usize, PersistError> {
    let name = normalize_name(name)?;
    scores
        .add_score(name, score)
        .ok_or(PersistError::NotQualifying(score))
}

/// In-memory store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn submit(&mut self, name: &str, score: u64) -> Result<usize, PersistError> {
        submit_to(&mut self.scores, name, score)
    }

    fn top(&self, n: usize) -> Result<Vec<HighScoreEntry>, PersistError> {
        Ok(self.scores.top(n).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_trimmed_and_required() {
        assert_eq!(normalize_name("  ace \n").unwrap(), "ace");
        assert!(matches!(normalize_name("   "), Err(PersistError::NameRequired)));
    }

    #[test]
    fn test_memory_store_ranks() {
        let mut store = MemoryStore::new();
        assert_eq!(store.submit("a", 50).unwrap(), 1);
        assert_eq!(store.submit("b", 30).unwrap(), 2);
        assert_eq!(store.submit(" c ", 42).unwrap(), 2);

        let top = store.top(10).unwrap();
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert!(matches!(store.submit("z", 0), Err(PersistError::NotQualifying(0))));
        assert!(matches!(store.submit("", 10), Err(PersistError::NameRequired)));
    }
}
