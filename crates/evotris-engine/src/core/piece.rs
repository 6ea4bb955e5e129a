use arrayvec::ArrayVec;

use crate::{OutOfBoundsError, RejectedMoveError};

use super::{
    FLOOR_ROW, LAST_COLUMN,
    geometry::{PieceRotation, RotationStates, ShapeMatrix},
    occupancy::Occupancy,
    piece_kind::{Color, PieceKind},
    position::Position,
};

/// Cells occupied by a piece. A whole tetromino has four; line clears can strip it down
/// to none.
pub type PieceCells = ArrayVec<Position, 4>;

/// Anchor (top-left of the 4×4 bounding box) of every newly spawned piece.
pub const SPAWN_ANCHOR: Position = Position::new(3, -4);

/// Identifies a piece (or the fragment it became) within one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct PieceId(u32);

impl PieceId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Horizontal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Direction {
    Left,
    Right,
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn box_offset(offset: usize) -> i8 {
    // Offsets inside the 4×4 bounding box are always 0..4.
    offset as i8
}

/// Places `matrix` at `anchor` and returns the occupied board cells in row-major order.
///
/// Fails if any resulting cell would sit below the floor (row > 19). Callers treat the
/// failure as a rejected rotation or spawn.
///
/// # Panics
///
/// Panics if `matrix` has more than four occupied cells.
pub fn occupied_cells(matrix: ShapeMatrix, anchor: Position) -> Result<PieceCells, OutOfBoundsError> {
    assert!(matrix.cell_count() <= 4, "a piece shape has at most four cells");
    let mut cells = PieceCells::new();
    for (dx, dy) in matrix.cells() {
        let pos = anchor.offset(box_offset(dx), box_offset(dy));
        if pos.row() > FLOOR_ROW {
            return Err(OutOfBoundsError);
        }
        cells.push(pos);
    }
    Ok(cells)
}

/// A falling or placed piece.
///
/// Pieces are values: movement and rotation return a new `Piece` and leave the original
/// untouched, so a rejected move is simply never stored.
///
/// Once a piece is placed, line clears may remove some of its cells. The remaining
/// fragment keeps its id and falls as a unit during settling, but is no longer described
/// by its rotation matrix.
///
/// # Example
///
/// ```
/// use evotris_engine::{Occupancy, Piece, PieceId, PieceKind, Position};
///
/// let piece = Piece::spawn(PieceId::new(0), PieceKind::I).unwrap();
/// assert_eq!(piece.anchor(), Position::new(3, -4));
/// assert_eq!(piece.cells()[0], Position::new(3, -2));
///
/// let fallen = piece.moved_down(6);
/// assert_eq!(fallen.anchor(), Position::new(3, 2));
/// assert!(!fallen.is_landed(&Occupancy::EMPTY));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    rotation: PieceRotation,
    anchor: Position,
    rotations: RotationStates,
    cells: PieceCells,
}

impl Piece {
    /// Creates a piece of `kind` in the given rotation with its bounding box at `anchor`.
    pub fn new(
        id: PieceId,
        kind: PieceKind,
        rotation: PieceRotation,
        anchor: Position,
    ) -> Result<Self, OutOfBoundsError> {
        let rotations = kind.rotation_states();
        let cells = occupied_cells(rotations.get(rotation), anchor)?;
        Ok(Self {
            id,
            kind,
            rotation,
            anchor,
            rotations,
            cells,
        })
    }

    /// Creates a piece of `kind` in spawn orientation at [`SPAWN_ANCHOR`].
    pub fn spawn(id: PieceId, kind: PieceKind) -> Result<Self, OutOfBoundsError> {
        Self::new(id, kind, PieceRotation::default(), SPAWN_ANCHOR)
    }

    #[must_use]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.kind.color()
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub fn rotation_states(&self) -> &RotationStates {
        &self.rotations
    }

    /// The occupancy matrix of the current rotation.
    #[must_use]
    pub fn matrix(&self) -> ShapeMatrix {
        self.rotations.get(self.rotation)
    }

    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Returns `true` once line clears have removed every cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if the piece is resting: it has no cells, touches the floor, or
    /// another piece owns a cell directly below one of its cells.
    #[must_use]
    pub fn is_landed(&self, occupancy: &Occupancy) -> bool {
        self.cells.is_empty()
            || self.cells.iter().any(|pos| pos.row() >= FLOOR_ROW)
            || occupancy.supports(&self.cells, self.id)
    }

    /// Moves the piece and every cell down by `distance` rows.
    ///
    /// No collision check: callers establish with [`Self::is_landed`] that the step is
    /// free.
    #[must_use]
    pub fn moved_down(&self, distance: i8) -> Self {
        Self {
            anchor: self.anchor.offset(0, distance),
            cells: self.cells.iter().map(|pos| pos.offset(0, distance)).collect(),
            ..self.clone()
        }
    }

    /// Moves the piece up to `distance` columns, stopping at the side walls.
    ///
    /// The new anchor column is clamped so the leading (or trailing) occupied column of
    /// the current matrix stays on the board. A `distance` of 0 only applies that clamp.
    pub fn moved_horizontally(
        &self,
        direction: Direction,
        distance: i8,
        occupancy: &Occupancy,
    ) -> Result<Self, RejectedMoveError> {
        let matrix = self.matrix();
        let col = match direction {
            Direction::Left => {
                let lead = matrix.leading_column().map_or(0, box_offset);
                (self.anchor.col() - distance).max(-lead)
            }
            Direction::Right => {
                let trail = matrix.trailing_column().map_or(0, box_offset);
                (self.anchor.col() + distance).min(LAST_COLUMN - trail)
            }
        };
        let anchor = self.anchor.with_col(col);
        let cells =
            occupied_cells(matrix, anchor).map_err(|OutOfBoundsError| RejectedMoveError::OutOfBounds)?;
        if occupancy.intersects(&cells, self.id) {
            return Err(RejectedMoveError::Collision);
        }
        Ok(Self {
            anchor,
            cells,
            ..self.clone()
        })
    }

    /// Rotates the piece 90° counterclockwise about its anchor.
    ///
    /// There are no wall kicks. The rotation is rejected if the new cells fall below the
    /// floor or overlap another piece. An accepted rotation is folded back between the
    /// side walls by a zero-distance left move followed by a zero-distance right move;
    /// if that fold lands on another piece the whole rotation is rejected.
    pub fn rotated_ccw(&self, occupancy: &Occupancy) -> Result<Self, RejectedMoveError> {
        let rotation = self.rotation.rotated_ccw();
        let cells = occupied_cells(self.rotations.get(rotation), self.anchor)
            .map_err(|OutOfBoundsError| RejectedMoveError::OutOfBounds)?;
        if occupancy.intersects(&cells, self.id) {
            return Err(RejectedMoveError::Collision);
        }
        let rotated = Self {
            rotation,
            cells,
            ..self.clone()
        };
        rotated
            .moved_horizontally(Direction::Left, 0, occupancy)?
            .moved_horizontally(Direction::Right, 0, occupancy)
    }

    /// Removes the cells in board row `row` and returns them.
    pub(crate) fn remove_cells_in_row(&mut self, row: i8) -> PieceCells {
        let removed = self.cells.iter().copied().filter(|pos| pos.row() == row).collect();
        self.cells.retain(|pos| pos.row() != row);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(kind: PieceKind, rotation: u8, col: i8, row: i8) -> Piece {
        Piece::new(PieceId::new(1), kind, PieceRotation::new(rotation), Position::new(col, row))
            .unwrap()
    }

    fn positions(cells: &[(i8, i8)]) -> Vec<Position> {
        cells.iter().map(|&(c, r)| Position::new(c, r)).collect()
    }

    #[test]
    fn test_spawned_i_piece_cells() {
        let piece = Piece::spawn(PieceId::new(0), PieceKind::I).unwrap();
        assert_eq!(piece.anchor(), SPAWN_ANCHOR);
        assert_eq!(piece.cells(), positions(&[(3, -2), (4, -2), (5, -2), (6, -2)]));
    }

    #[test]
    fn test_occupied_cells_rejects_rows_below_floor() {
        let matrix = PieceKind::I.canonical_shape();
        assert!(occupied_cells(matrix, Position::new(0, 17)).is_ok());
        assert_eq!(occupied_cells(matrix, Position::new(0, 18)), Err(OutOfBoundsError));
    }

    #[test]
    fn test_move_left_clamps_at_wall() {
        // Canonical S has its leftmost cell in column 0 of the box.
        let s = piece(PieceKind::S, 0, 1, 0);
        let moved = s.moved_horizontally(Direction::Left, 5, &Occupancy::EMPTY).unwrap();
        assert_eq!(moved.anchor().col(), 0);

        // Canonical O starts in column 1 of the box, so the anchor may go to -1.
        let o = piece(PieceKind::O, 0, 1, 0);
        let moved = o.moved_horizontally(Direction::Left, 5, &Occupancy::EMPTY).unwrap();
        assert_eq!(moved.anchor().col(), -1);
        assert!(moved.cells().iter().all(|p| p.col() >= 0));
    }

    #[test]
    fn test_move_right_clamps_at_wall() {
        let i = piece(PieceKind::I, 0, 3, 0);
        let moved = i.moved_horizontally(Direction::Right, 9, &Occupancy::EMPTY).unwrap();
        assert_eq!(moved.anchor().col(), 6);
        assert_eq!(moved.cells().last().map(|p| p.col()), Some(9));
    }

    #[test]
    fn test_zero_distance_move_is_identity() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                let p = piece(kind, rotation, 3, 5);
                for direction in [Direction::Left, Direction::Right] {
                    let moved = p.moved_horizontally(direction, 0, &Occupancy::EMPTY).unwrap();
                    assert_eq!(moved, p);
                }
            }
        }
    }

    #[test]
    fn test_move_into_placed_cell_is_rejected() {
        let mut occupancy = Occupancy::EMPTY;
        occupancy
            .occupy(&[Position::new(2, 2)], PieceId::new(9))
            .unwrap();
        let i = piece(PieceKind::I, 0, 3, 0);
        let result = i.moved_horizontally(Direction::Left, 1, &occupancy);
        assert_eq!(result, Err(RejectedMoveError::Collision));
    }

    #[test]
    fn test_rotate_ccw_uses_previous_state() {
        let t = piece(PieceKind::T, 0, 3, 5);
        let rotated = t.rotated_ccw(&Occupancy::EMPTY).unwrap();
        assert_eq!(rotated.rotation().index(), 3);
        assert_eq!(rotated.matrix(), PieceKind::T.rotation_states().get(PieceRotation::new(3)));
        assert_eq!(rotated.anchor(), t.anchor());
    }

    #[test]
    fn test_rotate_folds_piece_back_inside_walls() {
        // Vertical I (rotation 1) sits in box column 1; with anchor -1 it is in column 0.
        let vertical = piece(PieceKind::I, 1, -1, 5);
        let rotated = vertical.rotated_ccw(&Occupancy::EMPTY).unwrap();
        assert_eq!(rotated.rotation().index(), 0);
        assert_eq!(rotated.anchor().col(), 0);
        assert!(rotated.cells().iter().all(|p| (0..=9).contains(&p.col())));
    }

    #[test]
    fn test_rotate_below_floor_is_rejected() {
        // Horizontal I resting on the floor: the vertical state would reach row 20+.
        let i = piece(PieceKind::I, 0, 3, 17);
        assert_eq!(i.rotated_ccw(&Occupancy::EMPTY), Err(RejectedMoveError::OutOfBounds));
    }

    #[test]
    fn test_rotate_into_placed_cell_is_rejected() {
        let t = piece(PieceKind::T, 0, 3, 5);
        let rotated = t.rotated_ccw(&Occupancy::EMPTY).unwrap();
        let mut occupancy = Occupancy::EMPTY;
        occupancy
            .occupy(&rotated.cells()[..1], PieceId::new(9))
            .unwrap();
        assert_eq!(t.rotated_ccw(&occupancy), Err(RejectedMoveError::Collision));
    }

    #[test]
    fn test_landed_on_floor_and_on_other_piece() {
        let o = piece(PieceKind::O, 0, 3, 17);
        assert!(o.is_landed(&Occupancy::EMPTY));

        let o = piece(PieceKind::O, 0, 3, 10);
        assert!(!o.is_landed(&Occupancy::EMPTY));
        let mut occupancy = Occupancy::EMPTY;
        occupancy
            .occupy(&[Position::new(5, 13)], PieceId::new(9))
            .unwrap();
        assert!(o.is_landed(&occupancy));
    }

    #[test]
    fn test_empty_fragment_is_landed() {
        let mut o = piece(PieceKind::O, 0, 3, 0);
        o.remove_cells_in_row(1);
        o.remove_cells_in_row(2);
        assert!(o.is_empty());
        assert!(o.is_landed(&Occupancy::EMPTY));
    }

    #[test]
    fn test_move_down_shifts_fragment_cells() {
        let mut o = piece(PieceKind::O, 0, 3, 0);
        let removed = o.remove_cells_in_row(2);
        assert_eq!(removed.len(), 2);
        let fallen = o.moved_down(3);
        assert_eq!(fallen.anchor(), Position::new(3, 3));
        assert_eq!(fallen.cells(), positions(&[(4, 4), (5, 4)]));
    }
}
