//! High score leaderboard
//!
//! Keeps the top 10 runs, best first. Storage is handled by a
//! [`ScoreStore`](crate::persistence::ScoreStore).

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Whole seconds survived
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    ///
    /// Ties rank below the entries already present. Returns the rank achieved
    /// (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, name: impl Into<String>, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.into(),
            score,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// The best `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[u64]) -> HighScores {
        let mut hs = HighScores::new();
        for (i, &s) in scores.iter().enumerate() {
            hs.add_score(format!("p{i}"), s);
        }
        hs
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut hs = board(&[50, 30, 10]);
        assert_eq!(hs.potential_rank(42), Some(2));
        assert_eq!(hs.add_score("new", 42), Some(2));
        let scores: Vec<_> = hs.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 42, 30, 10]);
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut hs = board(&[30, 20]);
        assert_eq!(hs.add_score("late", 20), Some(3));
        assert_eq!(hs.entries[1].name, "p1");
    }

    #[test]
    fn test_full_board() {
        let mut hs = board(&[100, 90, 80, 70, 60, 50, 40, 30, 20, 10]);
        assert!(!hs.qualifies(10));
        assert!(!hs.qualifies(0));
        assert_eq!(hs.add_score("x", 5), None);
        assert_eq!(hs.add_score("y", 11), Some(10));
        assert_eq!(hs.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.entries.last().map(|e| e.score), Some(11));
        assert_eq!(hs.top(3).len(), 3);
        assert_eq!(hs.top_score(), Some(100));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let hs = HighScores::new();
        assert!(!hs.qualifies(0));
        assert!(hs.qualifies(1));
    }
}
