use serde::{Deserialize, Serialize};

use super::{block::Block, shape::PieceKind};

/// A Tetris piece (tetromino) with position, rotation, and type.
///
/// The piece keeps its 4 local block offsets, which rotation rewrites in place.
/// Absolute cells are the local offsets translated by the origin.
///
/// # Rotation
///
/// The O-piece never rotates. Every other piece rotates 90° around its
/// **first** local block, so all coordinates stay integral without a geometric
/// center. Rotation does not check the board; callers test the result with
/// [`Board::is_legal`](crate::Board::is_legal) before accepting it.
///
/// # Example
///
/// ```
/// use neotris_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// let moved = piece.right();
/// let rotated = moved.rotated(true);
/// assert_eq!(rotated.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    blocks: [Block; 4],
    origin: Block,
    rotation: PieceRotation,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.origin.x,
            self.origin.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '#' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;

        let mut kind_chars = kind_str.chars();
        let (Some(kind_char), None) = (kind_chars.next(), kind_chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "piece kind must be single character, got '{kind_str}'"
            )));
        };
        let kind = PieceKind::from_char(kind_char)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {kind_char}")))?;

        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '@' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let rotation_num = rotation_str.parse::<u8>().map_err(|e| {
            serde::de::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation_num > 3 {
            return Err(serde::de::Error::custom(format!(
                "rotation must be 0-3, got {rotation_num}"
            )));
        }

        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing ',' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let x = x_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Piece::with_rotation(kind, Block::new(x, y), PieceRotation(rotation_num)))
    }
}

impl Piece {
    /// Creates a piece of `kind` in spawn orientation at `origin`.
    #[must_use]
    pub const fn new(kind: PieceKind, origin: Block) -> Self {
        Self {
            kind,
            blocks: kind.blocks(),
            origin,
            rotation: PieceRotation(0),
        }
    }

    /// Creates a piece at the spawn position of a board `board_width` cells wide.
    ///
    /// Pieces spawn on row 0 with their origin at column `width / 2 - 1`.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let x = i32::try_from(board_width / 2).unwrap_or(i32::MAX) - 1;
        Self::new(kind, Block::new(x, 0))
    }

    /// Rebuilds a piece from its kind, origin and rotation index.
    ///
    /// The local blocks are a pure function of kind and rotation index, so they
    /// are recomputed by replaying clockwise rotations from spawn orientation.
    #[must_use]
    pub fn with_rotation(kind: PieceKind, origin: Block, rotation: PieceRotation) -> Self {
        let mut piece = Self::new(kind, origin);
        for _ in 0..rotation.index() {
            piece.rotate(true);
        }
        piece
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn origin(&self) -> Block {
        self.origin
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    /// Local block offsets relative to [`Self::origin`].
    #[must_use]
    pub const fn blocks(&self) -> &[Block; 4] {
        &self.blocks
    }

    /// Absolute board cells covered by this piece.
    #[must_use]
    pub fn absolute_positions(&self) -> [Block; 4] {
        self.blocks.map(|block| block + self.origin)
    }

    /// Rotates the local blocks 90° around the first block.
    ///
    /// No-op for the O-piece.
    pub fn rotate(&mut self, clockwise: bool) {
        if self.kind == PieceKind::O {
            return;
        }
        let pivot = self.blocks[0];
        self.blocks = self.blocks.map(|block| block.rotated_around(pivot, clockwise));
        self.rotation = if clockwise {
            self.rotation.rotated_right()
        } else {
            self.rotation.rotated_left()
        };
    }

    #[must_use]
    pub fn rotated(&self, clockwise: bool) -> Self {
        let mut piece = *self;
        piece.rotate(clockwise);
        piece
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            origin: self.origin + Block::new(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.translated(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.translated(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.translated(0, 1)
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    /// Creates a rotation state, or `None` if `index >= 4`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 4 { Some(Self(index)) } else { None }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_positions_translate_by_origin() {
        let piece = Piece::new(PieceKind::I, Block::new(4, 2));
        assert_eq!(
            piece.absolute_positions(),
            [
                Block::new(4, 2),
                Block::new(5, 2),
                Block::new(6, 2),
                Block::new(7, 2)
            ]
        );
    }

    #[test]
    fn test_spawn_position_is_center_left_top() {
        let piece = Piece::spawn(PieceKind::T, 10);
        assert_eq!(piece.origin(), Block::new(4, 0));
        assert_eq!(piece.rotation().index(), 0);
    }

    #[test]
    fn test_four_rotations_restore_piece() {
        for kind in PieceKind::ALL {
            for clockwise in [true, false] {
                let original = Piece::spawn(kind, 10);
                let mut piece = original;
                for _ in 0..4 {
                    piece.rotate(clockwise);
                }
                assert_eq!(piece.blocks(), original.blocks(), "{kind:?} cw={clockwise}");
                assert_eq!(piece.rotation(), original.rotation());
            }
        }
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let original = Piece::spawn(PieceKind::O, 10);
        assert_eq!(original.rotated(true), original);
        assert_eq!(original.rotated(false), original);
    }

    #[test]
    fn test_rotation_pivots_on_first_block() {
        // T: (0,0) (1,0) (2,0) (1,1) rotated clockwise around (0,0)
        let piece = Piece::new(PieceKind::T, Block::new(0, 0)).rotated(true);
        assert_eq!(
            piece.blocks(),
            &[
                Block::new(0, 0),
                Block::new(0, -1),
                Block::new(0, -2),
                Block::new(1, -1)
            ]
        );
        assert_eq!(piece.rotation().index(), 1);
    }

    #[test]
    fn test_counter_clockwise_rotation_index_wraps() {
        let piece = Piece::spawn(PieceKind::L, 10).rotated(false);
        assert_eq!(piece.rotation().index(), 3);
    }

    #[test]
    fn test_moves_do_not_change_shape() {
        let piece = Piece::spawn(PieceKind::S, 10);
        let moved = piece.left().down().right();
        assert_eq!(moved.blocks(), piece.blocks());
        assert_eq!(moved.origin(), Block::new(4, 1));
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::with_rotation(PieceKind::S, Block::new(4, 18), PieceRotation(1));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,18\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_deserialization_rebuilds_rotated_blocks() {
        let mut piece = Piece::spawn(PieceKind::J, 10);
        piece.rotate(false);
        piece.rotate(false);

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"J#2@4,0\"");
        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.blocks(), piece.blocks());
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"SS#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());
    }

    #[test]
    fn test_negative_origin_round_trips() {
        let piece = Piece::new(PieceKind::I, Block::new(-1, 3)).rotated(true);
        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"I#1@-1,3\"");
        assert_eq!(serde_json::from_str::<Piece>(&serialized).unwrap(), piece);
    }
}
