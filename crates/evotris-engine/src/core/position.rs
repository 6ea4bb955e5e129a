use serde::{Deserialize, Serialize};

use super::{FLOOR_ROW, LAST_COLUMN, TOP_ROW};

/// A cell coordinate on the board.
///
/// # Coordinate System
///
/// - Columns increase rightward, `0..=9`
/// - Rows increase downward, `0..=19` on the visible board
/// - Rows `-4..=-1` are the spawn buffer above the visible board
///
/// Positions are plain values. Moving a piece produces new positions and replaces the
/// stored ones, so a piece's anchor and its cells never alias each other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
pub struct Position {
    col: i8,
    row: i8,
}

impl Position {
    #[must_use]
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn col(self) -> i8 {
        self.col
    }

    #[must_use]
    pub const fn row(self) -> i8 {
        self.row
    }

    #[must_use]
    pub const fn offset(self, dcol: i8, drow: i8) -> Self {
        Self::new(self.col + dcol, self.row + drow)
    }

    #[must_use]
    pub const fn with_col(self, col: i8) -> Self {
        Self::new(col, self.row)
    }

    /// The cell directly underneath.
    #[must_use]
    pub const fn below(self) -> Self {
        self.offset(0, 1)
    }

    /// Returns `true` if the cell lies in the visible 10×20 area.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.col >= 0 && self.col <= LAST_COLUMN && self.row >= 0 && self.row <= FLOOR_ROW
    }

    /// Returns `true` if the cell lies in the visible area or the spawn buffer.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.col >= 0 && self.col <= LAST_COLUMN && self.row >= TOP_ROW && self.row <= FLOOR_ROW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_moves_one_row_down() {
        assert_eq!(Position::new(3, -2).below(), Position::new(3, -1));
    }

    #[test]
    fn test_visibility_bounds() {
        assert!(Position::new(0, 0).is_visible());
        assert!(Position::new(9, 19).is_visible());
        assert!(!Position::new(5, -1).is_visible());
        assert!(!Position::new(10, 5).is_visible());
        assert!(!Position::new(-1, 5).is_visible());

        assert!(Position::new(5, -4).is_on_board());
        assert!(!Position::new(5, -5).is_on_board());
        assert!(!Position::new(5, 20).is_on_board());
    }
}
