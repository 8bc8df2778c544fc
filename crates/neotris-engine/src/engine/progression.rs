use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Level and line-clear progress of one playthrough.
///
/// The level is a pure function of total lines cleared:
///
/// - **Level**: `min(15, lines / 5 + 1)` (starts at 1, one level per 5 lines)
/// - **Drop interval**: `max(0.1, 1 / (1 + 0.15 * (level - 1)))` seconds
///
/// # Example
///
/// ```
/// use neotris_engine::Progression;
///
/// let mut progression = Progression::new();
/// assert!(!progression.register_lines_cleared(4));
/// assert!(progression.register_lines_cleared(1)); // 5 lines: level 2
///
/// assert_eq!(progression.level(), 2);
/// assert_eq!(progression.lines_to_next_level(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    level: u32,
    lines_cleared: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub const MAX_LEVEL: u32 = 15;
    pub const LINES_PER_LEVEL: u32 = 5;
    pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

    /// Creates progression at level 1 with no lines cleared.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 1,
            lines_cleared: 0,
        }
    }

    /// Rebuilds progression from a saved line count.
    #[must_use]
    pub fn from_lines_cleared(lines_cleared: u32) -> Self {
        Self {
            level: Self::level_for_lines(lines_cleared),
            lines_cleared,
        }
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    #[must_use]
    pub fn level_for_lines(lines_cleared: u32) -> u32 {
        u32::min(Self::MAX_LEVEL, lines_cleared / Self::LINES_PER_LEVEL + 1)
    }

    /// Time between automatic one-row drops at `level`.
    ///
    /// Non-increasing in `level` and never below [`Self::MIN_DROP_INTERVAL`].
    #[must_use]
    pub fn drop_interval_for_level(level: u32) -> Duration {
        let steps = f64::from(level.saturating_sub(1));
        let secs = 1.0 / (1.0 + 0.15 * steps);
        Duration::from_secs_f64(secs).max(Self::MIN_DROP_INTERVAL)
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        Self::drop_interval_for_level(self.level)
    }

    /// Lines still needed to reach the next level (0 or less at the cap).
    #[must_use]
    pub fn lines_to_next_level(&self) -> i64 {
        i64::from(self.level * Self::LINES_PER_LEVEL) - i64::from(self.lines_cleared)
    }

    /// Current speed as a percentage, 0 at level 1 and 100 at the fastest
    /// possible drop interval.
    #[must_use]
    pub fn speed_percentage(&self) -> u32 {
        let raw = (1.0 - self.drop_interval().as_secs_f64()) * 111.0;
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = raw.clamp(0.0, 100.0) as u32;
        percent
    }

    /// Adds `count` cleared lines and recomputes the level.
    ///
    /// Returns whether the level increased.
    pub fn register_lines_cleared(&mut self, count: u32) -> bool {
        self.lines_cleared += count;
        let new_level = Self::level_for_lines(self.lines_cleared);
        let did_level_up = new_level > self.level;
        self.level = new_level;
        did_level_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_progression() {
        let progression = Progression::new();
        assert_eq!(progression.level(), 1);
        assert_eq!(progression.lines_cleared(), 0);
        assert_eq!(progression.drop_interval(), Duration::from_secs(1));
        assert_eq!(progression.speed_percentage(), 0);
    }

    #[test]
    fn test_level_up_every_five_lines() {
        let mut progression = Progression::new();
        assert!(!progression.register_lines_cleared(3));
        assert_eq!(progression.level(), 1);
        assert!(progression.register_lines_cleared(2));
        assert_eq!(progression.level(), 2);
        assert!(progression.register_lines_cleared(4));
        assert!(!progression.register_lines_cleared(0));
        assert_eq!(progression.level(), 2);
        assert!(progression.register_lines_cleared(1));
        assert_eq!(progression.level(), 3);
    }

    #[test]
    fn test_level_is_monotone_and_capped() {
        let mut progression = Progression::new();
        let mut previous = progression.level();
        for _ in 0..200 {
            progression.register_lines_cleared(4);
            assert!(progression.level() >= previous);
            assert!(progression.level() <= Progression::MAX_LEVEL);
            previous = progression.level();
        }
        assert_eq!(progression.level(), 15);
        assert!(!progression.register_lines_cleared(4));
    }

    #[test]
    fn test_drop_interval_is_non_increasing_with_floor() {
        let mut previous = Progression::drop_interval_for_level(1);
        for level in 2..=40 {
            let interval = Progression::drop_interval_for_level(level);
            assert!(interval <= previous, "level {level}");
            assert!(interval >= Progression::MIN_DROP_INTERVAL);
            previous = interval;
        }
        assert_eq!(
            Progression::drop_interval_for_level(100),
            Progression::MIN_DROP_INTERVAL
        );
    }

    #[test]
    fn test_drop_interval_values() {
        // 1 / (1 + 0.15 * 4) = 0.625
        let interval = Progression::drop_interval_for_level(5);
        assert!((interval.as_secs_f64() - 0.625).abs() < 1e-9);
        // 1 / (1 + 0.15 * 14) ≈ 0.3226
        let interval = Progression::drop_interval_for_level(15);
        assert!((interval.as_secs_f64() - 1.0 / 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_from_lines_cleared() {
        let progression = Progression::from_lines_cleared(23);
        assert_eq!(progression.level(), 5);
        assert_eq!(progression.lines_to_next_level(), 2);
        assert_eq!(Progression::from_lines_cleared(500).level(), 15);
    }

    #[test]
    fn test_speed_percentage_grows_with_level() {
        let slow = Progression::new().speed_percentage();
        let fast = Progression::from_lines_cleared(100).speed_percentage();
        assert!(fast > slow);
        assert!(fast <= 100);
    }
}
