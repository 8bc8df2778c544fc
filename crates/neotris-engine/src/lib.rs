//! Engine for Neotris, a falling-block puzzle game.
//!
//! - [`core`] - Blocks, piece shapes and the board grid
//! - [`engine`] - Game rules, lifecycle and persistence
//!
//! The crate has no rendering or input handling. Hosts drive a
//! [`GameEngine`] with commands and ticks and read its state back through
//! accessors and drained [`GameEvent`]s.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
mod serde_duration;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece collides with the board or its walls")]
pub struct PieceCollisionError;
