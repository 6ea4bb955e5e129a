use crate::{OutOfBoundsError, PieceCollisionError, PlacementError};

use super::{BOARD_WIDTH, TOP_ROW, TOTAL_ROWS, piece::PieceId, position::Position};

/// Dense position → owner lookup for placed cells.
///
/// Covers the visible board plus the spawn buffer above it, so every placed cell has a
/// slot. Collision and support queries are constant-time lookups instead of scans over
/// every other piece. The board keeps this grid in sync as cells are added, removed and
/// moved.
///
/// # Layout
///
/// ```text
/// grid row 0..4   → board rows -4..-1 (spawn buffer)
/// grid row 4..24  → board rows  0..19 (visible)
/// ```
///
/// Positions outside this area are never occupied: queries on them return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    cells: [[Option<PieceId>; BOARD_WIDTH]; TOTAL_ROWS],
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Occupancy {
    pub const EMPTY: Self = Self {
        cells: [[None; BOARD_WIDTH]; TOTAL_ROWS],
    };

    fn slot(pos: Position) -> Option<(usize, usize)> {
        let x = usize::try_from(pos.col()).ok()?;
        let y = usize::try_from(i16::from(pos.row()) - i16::from(TOP_ROW)).ok()?;
        (x < BOARD_WIDTH && y < TOTAL_ROWS).then_some((x, y))
    }

    /// Returns the piece owning the cell at `pos`, if any.
    #[must_use]
    pub fn owner_at(&self, pos: Position) -> Option<PieceId> {
        let (x, y) = Self::slot(pos)?;
        self.cells[y][x]
    }

    /// Returns `true` if `pos` is owned by a piece other than `id`.
    #[must_use]
    pub fn is_occupied_by_other(&self, pos: Position, id: PieceId) -> bool {
        self.owner_at(pos).is_some_and(|owner| owner != id)
    }

    /// Returns `true` if any of `cells` overlaps a cell owned by another piece.
    #[must_use]
    pub fn intersects(&self, cells: &[Position], id: PieceId) -> bool {
        cells.iter().any(|&pos| self.is_occupied_by_other(pos, id))
    }

    /// Returns `true` if another piece owns a cell directly below any of `cells`.
    #[must_use]
    pub fn supports(&self, cells: &[Position], id: PieceId) -> bool {
        cells
            .iter()
            .any(|&pos| self.is_occupied_by_other(pos.below(), id))
    }

    /// Number of occupied cells in board row `row`.
    #[must_use]
    pub fn row_count(&self, row: i8) -> usize {
        Self::slot(Position::new(0, row))
            .map_or(0, |(_, y)| self.cells[y].iter().flatten().count())
    }

    /// Marks `cells` as owned by `id`.
    ///
    /// Fails without changing anything if a cell lies outside the tracked area or is
    /// owned by another piece.
    pub(crate) fn occupy(
        &mut self,
        cells: &[Position],
        id: PieceId,
    ) -> Result<(), PlacementError> {
        for &pos in cells {
            let (x, y) = Self::slot(pos).ok_or(OutOfBoundsError)?;
            if self.cells[y][x].is_some_and(|owner| owner != id) {
                return Err(PieceCollisionError.into());
            }
        }
        for &pos in cells {
            if let Some((x, y)) = Self::slot(pos) {
                self.cells[y][x] = Some(id);
            }
        }
        Ok(())
    }

    /// Clears every cell in `cells` that is owned by `id`.
    pub(crate) fn vacate(&mut self, cells: &[Position], id: PieceId) {
        for &pos in cells {
            if let Some((x, y)) = Self::slot(pos)
                && self.cells[y][x] == Some(id)
            {
                self.cells[y][x] = None;
            }
        }
    }

    /// Iterates over all occupied positions and their owners.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, PieceId)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, owner)| {
                owner.map(|id| (grid_position(x, y), id))
            })
        })
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn grid_position(x: usize, y: usize) -> Position {
    Position::new(x as i8, y as i8 + TOP_ROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> PieceId {
        PieceId::new(n)
    }

    #[test]
    fn test_owner_lookup_covers_spawn_buffer() {
        let mut occupancy = Occupancy::EMPTY;
        let cells = [Position::new(0, -4), Position::new(9, 19)];
        occupancy.occupy(&cells, id(1)).unwrap();

        assert_eq!(occupancy.owner_at(Position::new(0, -4)), Some(id(1)));
        assert_eq!(occupancy.owner_at(Position::new(9, 19)), Some(id(1)));
        assert_eq!(occupancy.owner_at(Position::new(5, 5)), None);
        assert_eq!(occupancy.owner_at(Position::new(-1, 5)), None);
        assert_eq!(occupancy.owner_at(Position::new(5, 20)), None);
    }

    #[test]
    fn test_intersection_ignores_own_cells() {
        let mut occupancy = Occupancy::EMPTY;
        occupancy.occupy(&[Position::new(3, 3)], id(1)).unwrap();

        assert!(!occupancy.intersects(&[Position::new(3, 3)], id(1)));
        assert!(occupancy.intersects(&[Position::new(3, 3)], id(2)));
        assert!(!occupancy.intersects(&[Position::new(-1, 3)], id(2)));
    }

    #[test]
    fn test_support_looks_one_row_down() {
        let mut occupancy = Occupancy::EMPTY;
        occupancy.occupy(&[Position::new(4, 10)], id(1)).unwrap();

        assert!(occupancy.supports(&[Position::new(4, 9)], id(2)));
        assert!(!occupancy.supports(&[Position::new(4, 8)], id(2)));
        assert!(!occupancy.supports(&[Position::new(4, 9)], id(1)));
    }

    #[test]
    fn test_occupy_rejects_collision_and_out_of_bounds_atomically() {
        let mut occupancy = Occupancy::EMPTY;
        occupancy.occupy(&[Position::new(0, 0)], id(1)).unwrap();

        let result = occupancy.occupy(&[Position::new(1, 0), Position::new(0, 0)], id(2));
        assert!(matches!(result, Err(PlacementError::Collision(_))));
        assert_eq!(occupancy.owner_at(Position::new(1, 0)), None);

        let result = occupancy.occupy(&[Position::new(1, 0), Position::new(10, 0)], id(2));
        assert!(matches!(result, Err(PlacementError::OutOfBounds(_))));
        assert_eq!(occupancy.owner_at(Position::new(1, 0)), None);
    }

    #[test]
    fn test_row_count_and_vacate() {
        let mut occupancy = Occupancy::EMPTY;
        let cells = [Position::new(0, 19), Position::new(1, 19), Position::new(1, 18)];
        occupancy.occupy(&cells, id(1)).unwrap();
        assert_eq!(occupancy.row_count(19), 2);
        assert_eq!(occupancy.row_count(18), 1);

        occupancy.vacate(&[Position::new(0, 19)], id(2));
        assert_eq!(occupancy.row_count(19), 2);

        occupancy.vacate(&[Position::new(0, 19)], id(1));
        assert_eq!(occupancy.row_count(19), 1);
        assert_eq!(occupancy.occupied().count(), 2);
    }
}
