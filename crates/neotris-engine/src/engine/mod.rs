//! Game rules, lifecycle and persistence.
//!
//! This module builds on the core data structures to implement Neotris
//! gameplay:
//!
//! - [`GameEngine`] - One game: board, falling piece, preview queue and lifecycle
//! - [`Progression`] - Level and drop speed derived from cleared lines
//! - [`Score`] - Line-clear scoring and the high score
//! - [`PieceRandomizer`] - Piece generation (uniform, 7-bag or fixed sequence)
//! - [`Persistence`] - Storage boundary for saved games, sessions and the high score
//! - [`Ticker`] - Fixed-cadence tick source for real-time drivers
//!
//! # Game Flow
//!
//! 1. Construct a [`GameEngine`] with an [`EngineConfig`] and a store; a saved
//!    game in the store is restored as paused
//! 2. [`GameEngine::start`] begins play
//! 3. The driver calls [`GameEngine::tick`] at a fixed cadence and forwards
//!    player input as [`GameCommand`]s
//! 4. Landed pieces lock, complete rows clear and the next piece spawns
//! 5. The game ends when a piece locks in the top row or the next piece cannot
//!    spawn; a [`SessionRecord`] is written to the store
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use neotris_engine::{EngineConfig, GameCommand, GameEngine, GameEvent, MemoryStore};
//!
//! let mut engine = GameEngine::new(EngineConfig::default(), MemoryStore::new());
//! engine.apply(GameCommand::Start).unwrap();
//!
//! // Illegal moves are reported but change nothing.
//! for _ in 0..20 {
//!     engine.apply(GameCommand::MoveLeft).ok();
//! }
//! engine.apply(GameCommand::HardDrop).unwrap();
//! engine.tick(Duration::from_secs(1));
//!
//! let locked = engine
//!     .take_events()
//!     .into_iter()
//!     .any(|event| matches!(event, GameEvent::PieceLocked { .. }));
//! assert!(locked);
//! ```

pub use self::{
    config::*, game_engine::*, persistence::*, progression::*, randomizer::*, record::*,
    score::*, state::*, ticker::*,
};

mod config;
mod game_engine;
mod persistence;
mod progression;
mod randomizer;
mod record;
mod score;
mod state;
mod ticker;
