use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameState, Piece, PieceKind, PieceRandomizer, Progression, Score};

/// Immutable summary of one finished game, written once at game over.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub final_score: u64,
    pub final_level: u32,
    pub total_lines_cleared: u32,
    #[serde(with = "crate::serde_duration")]
    pub play_duration: Duration,
}

/// Snapshot of a game in progress, used to resume after a restart.
///
/// Board cells are stored as color tag names rather than live values so the
/// snapshot stays readable and independent of in-memory layouts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub board: Vec<Vec<Option<String>>>,
    pub current_piece: Option<Piece>,
    pub next_pieces: Vec<PieceKind>,
    /// Generator state after dealing `next_pieces`.
    pub randomizer: PieceRandomizer,
    pub progression: Progression,
    pub score: Score,
    pub state: GameState,
    pub created_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
    #[serde(with = "crate::serde_duration")]
    pub play_duration: Duration,
}
