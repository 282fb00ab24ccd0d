//! High score leaderboard
//!
//! Scores are whole seconds survived. The board keeps the top 5, descending,
//! and is persisted through the [`crate::persistence::ScoreStore`].

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<u32>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a board from stored scores, restoring the ordering invariant
    pub fn from_scores(mut scores: Vec<u32>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { entries: scores }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|&s| score > s).unwrap_or(true)
    }

    /// Insert a finished game's score.
    /// Returns the rank achieved (1-indexed) or None if it fell off the board
    pub fn add_score(&mut self, score: u32) -> Option<usize> {
        // Ties keep the older score ahead
        let pos = self
            .entries
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, score);
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn scores(&self) -> &[u32] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_top_five_descending() {
        let mut board = HighScores::new();
        for score in [10, 50, 30, 20, 40, 5] {
            board.add_score(score);
        }
        assert_eq!(board.scores(), &[50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_rank_reporting() {
        let mut board = HighScores::from_scores(vec![50, 40, 30, 20, 10]);
        assert_eq!(board.add_score(45), Some(2));
        assert_eq!(board.add_score(1), None);
        assert_eq!(board.scores(), &[50, 45, 40, 30, 20]);
    }

    #[test]
    fn test_zero_score_still_recorded() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score(0), Some(1));
        assert_eq!(board.top_score(), Some(0));
    }

    #[test]
    fn test_from_scores_normalizes() {
        let board = HighScores::from_scores(vec![1, 9, 3, 7, 5, 8, 2]);
        assert_eq!(board.scores(), &[9, 8, 7, 5, 3]);
        assert!(!board.qualifies(3));
        assert!(board.qualifies(4));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let board = HighScores::from_scores(vec![3, 1, 2]);
        assert_eq!(serde_json::to_string(&board).unwrap(), "[3,2,1]");
    }

    proptest! {
        #[test]
        fn board_stays_sorted_and_bounded(scores in proptest::collection::vec(0u32..1000, 0..40)) {
            let mut board = HighScores::new();
            for &s in &scores {
                board.add_score(s);
            }
            let entries = board.scores();
            prop_assert!(entries.len() <= MAX_HIGH_SCORES);
            prop_assert!(entries.windows(2).all(|w| w[0] >= w[1]));

            let mut expected = scores.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(MAX_HIGH_SCORES);
            prop_assert_eq!(entries, expected.as_slice());
        }
    }
}
