//! JSON file backed score store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistError, ScoreStore, submit_to};
use crate::highscores::{HighScoreEntry, HighScores};

/// Leaderboard kept in a JSON file, rewritten after every submission
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: HighScores,
}

impl JsonFileStore {
    /// Open a store. A missing file starts an empty leaderboard.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let scores = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No score file at {}, starting fresh", path.display());
                HighScores::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, scores })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    // Write to a sibling temp file then rename over the old one
    fn save(&self) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!(
            "High scores saved ({} entries) to {}",
            self.scores.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn submit(&mut self, name: &str, score: u64) -> Result<usize, PersistError> {
        let rank = submit_to(&mut self.scores, name, score)?;
        self.save()?;
        Ok(rank)
    }

    fn top(&self, n: usize) -> Result<Vec<HighScoreEntry>, PersistError> {
        Ok(self.scores.top(n).to_vec())
    }
}
