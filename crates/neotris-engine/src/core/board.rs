use super::{block::Block, piece::Piece, shape::PieceColor};

/// A single board cell: empty, or filled with the color tag of the piece that
/// was placed there.
pub type Cell = Option<PieceColor>;

/// Error returned when rebuilding a board from saved color tags.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardDecodeError {
    #[display("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[display("row {row}: expected {expected} cells, got {actual}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("unknown color tag '{tag}' at ({x}, {y})")]
    UnknownTag {
        tag: String,
        x: usize,
        y: usize,
    },
}

/// Fixed-size grid of cells.
///
/// Row 0 is the top row. Cells are stored row-major. The board is mutated only
/// by [`Self::commit`] (placing a landed piece) and
/// [`Self::clear_completed_rows`] (removing full rows).
///
/// # Example
///
/// ```
/// use neotris_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::standard();
/// let piece = Piece::spawn(PieceKind::O, board.width());
/// assert!(board.is_legal(&piece.absolute_positions()));
///
/// board.fill_piece(&piece);
/// assert!(board.is_top_row_occupied());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub const STANDARD_WIDTH: usize = 10;
    pub const STANDARD_HEIGHT: usize = 20;

    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must not be empty");
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Creates an empty 10×20 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Self::STANDARD_WIDTH, Self::STANDARD_HEIGHT)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index_of(&self, block: Block) -> Option<usize> {
        let x = usize::try_from(block.x).ok()?;
        let y = usize::try_from(block.y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns whether every block lies inside the board on an empty cell.
    #[must_use]
    pub fn is_legal(&self, blocks: &[Block]) -> bool {
        blocks
            .iter()
            .all(|&block| self.index_of(block).is_some_and(|i| self.cells[i].is_none()))
    }

    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        !self.is_legal(&piece.absolute_positions())
    }

    /// Writes `color` into each targeted cell.
    ///
    /// Callers check [`Self::is_legal`] first. Blocks outside the board are
    /// skipped.
    pub fn commit(&mut self, blocks: &[Block], color: PieceColor) {
        for &block in blocks {
            if let Some(i) = self.index_of(block) {
                self.cells[i] = Some(color);
            }
        }
    }

    /// Places the piece's cells on the board with the piece's color.
    pub fn fill_piece(&mut self, piece: &Piece) {
        self.commit(&piece.absolute_positions(), piece.kind().color());
    }

    fn is_row_complete(&self, y: usize) -> bool {
        self.cells[y * self.width..][..self.width]
            .iter()
            .all(Option::is_some)
    }

    /// Removes every complete row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top; surviving rows are shifted down past
    /// the removed ones in a single pass and empty rows fill the top.
    pub fn clear_completed_rows(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for y in (0..self.height).rev() {
            if self.is_row_complete(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = y * width;
                self.cells.copy_within(src..src + width, src + count * width);
            }
        }
        self.cells[..count * width].fill(None);
        count
    }

    /// Returns whether any cell of row 0 is filled.
    #[must_use]
    pub fn is_top_row_occupied(&self) -> bool {
        self.cells[..self.width].iter().any(Option::is_some)
    }

    /// Converts the board to rows of color tags, top to bottom.
    #[must_use]
    pub fn to_tags(&self) -> Vec<Vec<Option<String>>> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(|color| color.as_tag().to_owned()))
                    .collect()
            })
            .collect()
    }

    /// Rebuilds a `width × height` board from rows of color tags.
    pub fn from_tags(
        width: usize,
        height: usize,
        rows: &[Vec<Option<String>>],
    ) -> Result<Self, BoardDecodeError> {
        if rows.len() != height {
            return Err(BoardDecodeError::RowCount {
                expected: height,
                actual: rows.len(),
            });
        }
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(BoardDecodeError::RowWidth {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (x, tag) in row.iter().enumerate() {
                let Some(tag) = tag else { continue };
                let color =
                    PieceColor::from_tag(tag).ok_or_else(|| BoardDecodeError::UnknownTag {
                        tag: tag.clone(),
                        x,
                        y,
                    })?;
                board.cells[y * width + x] = Some(color);
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn fill_row(board: &mut Board, y: i32, color: PieceColor) {
        let width = i32::try_from(board.width()).unwrap();
        let blocks: Vec<_> = (0..width).map(|x| Block::new(x, y)).collect();
        board.commit(&blocks, color);
    }

    #[test]
    fn test_initial_board_is_empty() {
        let board = Board::standard();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.filled_count(), 0);
        assert!(!board.is_top_row_occupied());
        assert_eq!(board.rows().count(), 20);
    }

    #[test]
    fn test_is_legal_rejects_out_of_bounds() {
        let mut board = Board::new(4, 3);
        let outside = [
            Block::new(-1, 0),
            Block::new(4, 0),
            Block::new(0, -1),
            Block::new(0, 3),
        ];
        for block in outside {
            assert!(!board.is_legal(&[block]), "{block:?} should be illegal");
        }
        // Same result regardless of fill state.
        fill_row(&mut board, 2, PieceColor::Red);
        for block in outside {
            assert!(!board.is_legal(&[block]), "{block:?} should be illegal");
        }
        assert!(board.is_legal(&[Block::new(0, 0), Block::new(3, 1)]));
    }

    #[test]
    fn test_is_legal_rejects_filled_cells() {
        let mut board = Board::standard();
        board.commit(&[Block::new(3, 5)], PieceColor::Blue);
        assert!(!board.is_legal(&[Block::new(3, 5)]));
        assert!(board.is_legal(&[Block::new(4, 5)]));
        assert_eq!(board.cell(3, 5), Some(Some(PieceColor::Blue)));
        assert_eq!(board.cell(10, 5), None);
    }

    #[test]
    fn test_fill_piece_uses_piece_color() {
        let mut board = Board::standard();
        let piece = Piece::spawn(PieceKind::Z, board.width());
        board.fill_piece(&piece);
        for block in piece.absolute_positions() {
            let (x, y) = (block.x as usize, block.y as usize);
            assert_eq!(board.cell(x, y), Some(Some(PieceColor::Red)));
        }
        assert_eq!(board.filled_count(), 4);
        assert!(board.is_colliding(&piece));
    }

    #[test]
    fn test_clear_single_bottom_row() {
        let mut board = Board::standard();
        fill_row(&mut board, 19, PieceColor::Cyan);
        board.commit(&[Block::new(0, 18)], PieceColor::Green);

        assert_eq!(board.clear_completed_rows(), 1);
        assert_eq!(board.filled_count(), 1);
        assert_eq!(board.cell(0, 19), Some(Some(PieceColor::Green)));
        assert_eq!(board.cell(0, 18), Some(None));
    }

    #[test]
    fn test_clear_multiple_rows_preserves_order() {
        let mut board = Board::new(3, 6);
        // Rows 1, 3 and 5 are complete; rows 2 and 4 carry markers.
        fill_row(&mut board, 1, PieceColor::Cyan);
        board.commit(&[Block::new(0, 2)], PieceColor::Red);
        fill_row(&mut board, 3, PieceColor::Cyan);
        board.commit(&[Block::new(1, 4)], PieceColor::Blue);
        fill_row(&mut board, 5, PieceColor::Cyan);
        let before = board.filled_count();

        let cleared = board.clear_completed_rows();
        assert_eq!(cleared, 3);
        assert_eq!(board.filled_count(), before - cleared * board.width());
        // Surviving rows keep their relative order at the bottom.
        assert_eq!(board.cell(1, 5), Some(Some(PieceColor::Blue)));
        assert_eq!(board.cell(0, 4), Some(Some(PieceColor::Red)));
        for y in 0..4 {
            assert!(board.rows().nth(y).unwrap().iter().all(Option::is_none));
        }
    }

    #[test]
    fn test_clear_adjacent_rows() {
        let mut board = Board::standard();
        for y in 16..20 {
            fill_row(&mut board, y, PieceColor::Cyan);
        }
        board.commit(&[Block::new(5, 15)], PieceColor::Purple);
        assert_eq!(board.clear_completed_rows(), 4);
        assert_eq!(board.filled_count(), 1);
        assert_eq!(board.cell(5, 19), Some(Some(PieceColor::Purple)));
    }

    #[test]
    fn test_partial_row_is_not_cleared() {
        let mut board = Board::standard();
        let blocks: Vec<_> = (0..9).map(|x| Block::new(x, 19)).collect();
        board.commit(&blocks, PieceColor::Yellow);
        assert_eq!(board.clear_completed_rows(), 0);
        assert_eq!(board.filled_count(), 9);
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::new(2, 3);
        for y in 0..3 {
            fill_row(&mut board, y, PieceColor::Orange);
        }
        assert_eq!(board.clear_completed_rows(), 3);
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_top_row_occupied() {
        let mut board = Board::standard();
        board.commit(&[Block::new(9, 1)], PieceColor::Red);
        assert!(!board.is_top_row_occupied());
        board.commit(&[Block::new(9, 0)], PieceColor::Red);
        assert!(board.is_top_row_occupied());
    }

    #[test]
    fn test_tags_round_trip() {
        let mut board = Board::new(3, 2);
        board.commit(&[Block::new(0, 1), Block::new(2, 0)], PieceColor::Purple);
        let tags = board.to_tags();
        assert_eq!(tags[0], vec![None, None, Some("purple".to_owned())]);
        assert_eq!(Board::from_tags(3, 2, &tags).unwrap(), board);
    }

    #[test]
    fn test_from_tags_rejects_mismatched_dimensions() {
        let tags = Board::new(3, 2).to_tags();
        assert_eq!(
            Board::from_tags(3, 3, &tags),
            Err(BoardDecodeError::RowCount {
                expected: 3,
                actual: 2
            })
        );
        assert!(matches!(
            Board::from_tags(4, 2, &tags),
            Err(BoardDecodeError::RowWidth { row: 0, .. })
        ));
    }

    #[test]
    fn test_from_tags_rejects_unknown_tag() {
        let tags = vec![vec![Some("teal".to_owned())]];
        assert!(matches!(
            Board::from_tags(1, 1, &tags),
            Err(BoardDecodeError::UnknownTag { x: 0, y: 0, .. })
        ));
    }
}
