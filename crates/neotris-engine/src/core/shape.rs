use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::block::Block;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// J-piece.
    J = 3,
    /// L-piece.
    L = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

/// Uniform, memoryless choice among the 7 kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Returns the local block offsets of the spawn orientation.
    ///
    /// The first block of each list is the rotation pivot.
    #[must_use]
    pub const fn blocks(self) -> [Block; 4] {
        PIECE_BLOCKS[self as usize]
    }

    /// Returns the color tag carried into board cells when this kind is placed.
    #[must_use]
    pub const fn color(self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::Cyan,
            PieceKind::O => PieceColor::Yellow,
            PieceKind::T => PieceColor::Purple,
            PieceKind::J => PieceColor::Blue,
            PieceKind::L => PieceColor::Orange,
            PieceKind::S => PieceColor::Green,
            PieceKind::Z => PieceColor::Red,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use neotris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use neotris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

const PIECE_BLOCKS: [[Block; 4]; PieceKind::LEN] = {
    const fn b(x: i32, y: i32) -> Block {
        Block::new(x, y)
    }
    [
        // I-piece
        [b(0, 0), b(1, 0), b(2, 0), b(3, 0)],
        // O-piece
        [b(0, 0), b(1, 0), b(0, 1), b(1, 1)],
        // T-piece
        [b(0, 0), b(1, 0), b(2, 0), b(1, 1)],
        // J-piece
        [b(0, 1), b(0, 0), b(1, 0), b(2, 0)],
        // L-piece
        [b(2, 1), b(0, 0), b(1, 0), b(2, 0)],
        // S-piece
        [b(1, 0), b(2, 0), b(0, 1), b(1, 1)],
        // Z-piece
        [b(0, 0), b(1, 0), b(1, 1), b(2, 1)],
    ]
};

/// Opaque color tag stored in filled board cells.
///
/// The engine never interprets the tag; a presentation layer resolves it to a
/// renderable color. Serialized as a lowercase name (`"cyan"`, `"red"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    Cyan,
    Yellow,
    Purple,
    Blue,
    Orange,
    Green,
    Red,
}

impl PieceColor {
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            PieceColor::Cyan => "cyan",
            PieceColor::Yellow => "yellow",
            PieceColor::Purple => "purple",
            PieceColor::Blue => "blue",
            PieceColor::Orange => "orange",
            PieceColor::Green => "green",
            PieceColor::Red => "red",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let color = match tag {
            "cyan" => PieceColor::Cyan,
            "yellow" => PieceColor::Yellow,
            "purple" => PieceColor::Purple,
            "blue" => PieceColor::Blue,
            "orange" => PieceColor::Orange,
            "green" => PieceColor::Green,
            "red" => PieceColor::Red,
            _ => return None,
        };
        Some(color)
    }
}
