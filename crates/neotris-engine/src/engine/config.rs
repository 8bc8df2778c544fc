use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Board, PieceRandomizer, PieceSeed, RandomizerPolicy};

/// Tunable parameters of a [`GameEngine`](crate::GameEngine).
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```
/// use neotris_engine::{EngineConfig, RandomizerPolicy};
///
/// let config: EngineConfig = serde_json::from_str(r#"{"randomizer": "seven-bag"}"#).unwrap();
/// assert_eq!(config.board_width, 10);
/// assert_eq!(config.randomizer, RandomizerPolicy::SevenBag);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Number of upcoming pieces kept visible after the current one.
    pub preview_len: usize,
    pub randomizer: RandomizerPolicy,
    /// Fixed seed for reproducible piece sequences; random when absent.
    pub seed: Option<PieceSeed>,
    /// How long the level-up flag stays raised, in play time.
    #[serde(with = "crate::serde_duration")]
    pub level_up_display: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: Board::STANDARD_WIDTH,
            board_height: Board::STANDARD_HEIGHT,
            preview_len: 2,
            randomizer: RandomizerPolicy::Uniform,
            seed: None,
            level_up_display: Duration::from_millis(1500),
        }
    }
}

impl EngineConfig {
    /// Builds an empty board with the configured dimensions.
    ///
    /// Zero dimensions are raised to one cell.
    #[must_use]
    pub fn board(&self) -> Board {
        Board::new(self.board_width.max(1), self.board_height.max(1))
    }

    #[must_use]
    pub fn randomizer(&self) -> PieceRandomizer {
        let policy = self.randomizer.clone();
        match self.seed {
            Some(seed) => PieceRandomizer::with_seed(policy, seed),
            None => PieceRandomizer::new(policy),
        }
    }
}
