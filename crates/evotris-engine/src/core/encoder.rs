use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH, board::Board, piece::Piece, piece_kind::PieceKind,
    position::Position,
};

/// Content of one visible cell as seen by an agent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum CellState {
    #[default]
    Empty = 0,
    Placed = 1,
    Active = 2,
}

impl CellState {
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

pub type CellGrid = [[CellState; BOARD_WIDTH]; BOARD_HEIGHT];

/// Compact numeric view of a board for an external decision-making agent.
///
/// The grid covers the visible rows only. Cells of the falling piece that are still in
/// the spawn buffer (or otherwise outside the grid) are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentObservation {
    grid: CellGrid,
    active_kind: Option<PieceKind>,
}

impl AgentObservation {
    /// Length of [`AgentObservation::to_input_vector`]: the flattened grid followed by
    /// the one-hot piece kind.
    pub const INPUT_LEN: usize = BOARD_WIDTH * BOARD_HEIGHT + PieceKind::LEN;

    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let mut grid = [[CellState::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        let placed = board.placed_pieces().iter().flat_map(Piece::cells);
        for &pos in placed {
            set_cell(&mut grid, pos, CellState::Placed);
        }
        if let Some(active) = board.active_piece() {
            for &pos in active.cells() {
                set_cell(&mut grid, pos, CellState::Active);
            }
        }
        Self {
            grid,
            active_kind: board.active_piece().map(Piece::kind),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[must_use]
    pub fn active_kind(&self) -> Option<PieceKind> {
        self.active_kind
    }

    /// The grid as `0` (empty), `1` (placed), `2` (active) values.
    #[must_use]
    pub fn to_matrix(&self) -> [[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.grid.map(|row| row.map(CellState::value))
    }

    #[must_use]
    pub fn active_kind_index(&self) -> Option<usize> {
        self.active_kind.map(PieceKind::index)
    }

    /// One-hot vector of the active piece kind; all zeros without a falling piece.
    #[must_use]
    pub fn piece_one_hot(&self) -> [f32; PieceKind::LEN] {
        let mut one_hot = [0.0; PieceKind::LEN];
        if let Some(index) = self.active_kind_index() {
            one_hot[index] = 1.0;
        }
        one_hot
    }

    /// Flattens the grid row by row and appends [`AgentObservation::piece_one_hot`].
    #[must_use]
    pub fn to_input_vector(&self) -> Vec<f32> {
        let mut input = Vec::with_capacity(Self::INPUT_LEN);
        input.extend(
            self.grid
                .iter()
                .flatten()
                .map(|&cell| f32::from(cell.value())),
        );
        input.extend(self.piece_one_hot());
        input
    }
}

fn set_cell(grid: &mut CellGrid, pos: Position, state: CellState) {
    let (Ok(col), Ok(row)) = (usize::try_from(pos.col()), usize::try_from(pos.row())) else {
        return;
    };
    if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
        *cell = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::PieceRotation;

    #[test]
    fn test_empty_board_encodes_to_zeros() {
        let observation = Board::new().encode();
        assert_eq!(observation.to_matrix(), [[0; BOARD_WIDTH]; BOARD_HEIGHT]);
        assert_eq!(observation.active_kind_index(), None);
        assert_eq!(observation.piece_one_hot(), [0.0; PieceKind::LEN]);
    }

    #[test]
    fn test_spawn_buffer_cells_are_skipped() {
        let mut board = Board::new();
        board.spawn(PieceKind::I).unwrap();

        let observation = board.encode();
        assert!(observation.grid().iter().flatten().all(|&c| c == CellState::Empty));
        assert_eq!(observation.active_kind(), Some(PieceKind::I));
        assert_eq!(observation.active_kind_index(), Some(0));
    }

    #[test]
    fn test_partially_visible_piece_is_clipped() {
        let mut board = Board::new();
        // Vertical I spanning rows -2..=1.
        board
            .spawn_at(PieceKind::I, PieceRotation::new(1), Position::new(3, -2))
            .unwrap();

        let matrix = board.encode().to_matrix();
        assert_eq!(matrix[0][4], 2);
        assert_eq!(matrix[1][4], 2);
        assert_eq!(matrix.iter().flatten().filter(|&&v| v == 2).count(), 2);
    }

    #[test]
    fn test_placed_and_active_cells() {
        let mut board = Board::new();
        board
            .insert_placed(PieceKind::O, PieceRotation::default(), Position::new(-1, 17))
            .unwrap();
        board
            .spawn_at(PieceKind::T, PieceRotation::default(), Position::new(4, 5))
            .unwrap();

        let observation = board.encode();
        let matrix = observation.to_matrix();
        assert_eq!(matrix[19][..3], [1, 1, 0]);
        assert_eq!(matrix[18][..3], [1, 1, 0]);
        assert_eq!(matrix[6][5], 2);
        assert_eq!(matrix[7][4..7], [2, 2, 2]);

        let mut expected_one_hot = [0.0; PieceKind::LEN];
        expected_one_hot[PieceKind::T.index()] = 1.0;
        assert_eq!(observation.piece_one_hot(), expected_one_hot);
    }

    #[test]
    fn test_input_vector_layout() {
        let mut board = Board::new();
        board
            .insert_placed(PieceKind::O, PieceRotation::default(), Position::new(7, 17))
            .unwrap();
        board.spawn(PieceKind::Z).unwrap();

        let input = board.encode().to_input_vector();
        assert_eq!(input.len(), AgentObservation::INPUT_LEN);
        assert_eq!(input.len(), 207);
        // Row 19, columns 8 and 9.
        assert_eq!(input[19 * BOARD_WIDTH + 8], 1.0);
        assert_eq!(input[19 * BOARD_WIDTH + 9], 1.0);
        assert_eq!(input[200 + PieceKind::Z.index()], 1.0);
        assert_eq!(input[200..].iter().sum::<f32>(), 1.0);
    }
}
