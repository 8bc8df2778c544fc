use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An integer coordinate pair.
///
/// Used both for the local offsets of a piece (relative to its origin) and for
/// absolute board cells. `x` grows rightward and `y` grows downward, so row 0
/// is the top row of the board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Block {
    pub x: i32,
    pub y: i32,
}

impl Block {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotates this offset 90° around `pivot`.
    ///
    /// Clockwise maps `(dx, dy)` to `(dy, -dx)`, counter-clockwise maps it to
    /// `(-dy, dx)`, where `(dx, dy)` is the offset from the pivot.
    #[must_use]
    pub const fn rotated_around(self, pivot: Self, clockwise: bool) -> Self {
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        if clockwise {
            Self::new(pivot.x + dy, pivot.y - dx)
        } else {
            Self::new(pivot.x - dy, pivot.y + dx)
        }
    }
}

impl Add for Block {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}
