use serde::{Deserialize, Serialize};

/// Lifecycle state of a game.
///
/// ```text
/// Waiting --start--> Playing <--pause/resume--> Paused
///                       |
///                       +--top out--> GameOver --reset--> Waiting
/// ```
///
/// Only `Playing` advances on ticks or accepts piece commands.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameState {
    #[default]
    #[display("waiting")]
    Waiting,
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

/// A discrete command from the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum GameCommand {
    Start,
    Pause,
    Resume,
    TogglePause,
    Reset,
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    RotateCounterClockwise,
    HardDrop,
}
