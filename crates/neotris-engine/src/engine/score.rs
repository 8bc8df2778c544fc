use serde::{Deserialize, Serialize};

/// Base points for line clears, multiplied by the current level.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];

/// Current score and best score.
///
/// The high score outlives single games: [`Score::reset`] zeroes only the
/// current score.
///
/// # Example
///
/// ```
/// use neotris_engine::Score;
///
/// let mut score = Score::with_high_score(1000);
/// score.award(4, 2); // 1200 * 2
///
/// assert_eq!(score.score(), 2400);
/// assert_eq!(score.high_score(), 2400);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    score: u64,
    high_score: u64,
}

impl Score {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_high_score(0)
    }

    #[must_use]
    pub const fn with_high_score(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Points for clearing `lines` rows at once on `level`.
    ///
    /// Counts outside 1-4 score nothing.
    #[must_use]
    pub fn points_for(lines: usize, level: u32) -> u64 {
        SCORE_TABLE.get(lines).copied().unwrap_or(0) * u64::from(level)
    }

    /// Adds the points for a line clear and raises the high score if exceeded.
    ///
    /// Returns the points awarded.
    pub fn award(&mut self, lines: usize, level: u32) -> u64 {
        let points = Self::points_for(lines, level);
        self.score += points;
        self.high_score = self.high_score.max(self.score);
        points
    }

    /// Returns whether the current game holds the high score.
    #[must_use]
    pub const fn is_high_score(&self) -> bool {
        self.score > 0 && self.score == self.high_score
    }

    /// Raises the high score to at least `high_score`.
    pub fn merge_high_score(&mut self, high_score: u64) {
        self.high_score = self.high_score.max(high_score);
    }

    /// Starts a new game: the score goes back to zero, the high score stays.
    pub const fn reset(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(Score::points_for(0, 3), 0);
        assert_eq!(Score::points_for(1, 1), 40);
        assert_eq!(Score::points_for(2, 1), 100);
        assert_eq!(Score::points_for(3, 1), 300);
        assert_eq!(Score::points_for(4, 1), 1200);
        assert_eq!(Score::points_for(5, 1), 0);
    }

    #[test]
    fn test_tetris_scales_with_level() {
        for level in 1..=15 {
            let mut score = Score::new();
            assert_eq!(score.award(4, level), 1200 * u64::from(level));
            assert_eq!(score.score(), 1200 * u64::from(level));
        }
    }

    #[test]
    fn test_high_score_is_max_of_previous_and_score() {
        let mut score = Score::with_high_score(500);
        score.award(1, 1);
        assert_eq!(score.score(), 40);
        assert_eq!(score.high_score(), 500);
        assert!(!score.is_high_score());

        score.award(2, 5);
        assert_eq!(score.score(), 540);
        assert_eq!(score.high_score(), 540);
        assert!(score.is_high_score());
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut score = Score::new();
        score.award(3, 2);
        score.reset();
        assert_eq!(score.score(), 0);
        assert_eq!(score.high_score(), 600);
    }

    #[test]
    fn test_merge_high_score_never_lowers() {
        let mut score = Score::with_high_score(900);
        score.merge_high_score(100);
        assert_eq!(score.high_score(), 900);
        score.merge_high_score(1000);
        assert_eq!(score.high_score(), 1000);
    }
}
