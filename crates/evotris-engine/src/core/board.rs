use tracing::{debug, trace};

use crate::{PlacementError, RejectedMoveError};

use super::{
    BOARD_WIDTH, FLOOR_ROW,
    encoder::AgentObservation,
    geometry::PieceRotation,
    occupancy::Occupancy,
    piece::{Direction, Piece, PieceId, SPAWN_ANCHOR},
    piece_kind::{Color, PieceKind},
    position::Position,
};

/// Per-column stack heights of the placed cells.
pub type ColumnHeights = [i32; BOARD_WIDTH];

/// Shape heuristics of the settled board, used as reward inputs by agents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoardHeuristics {
    /// Sum of all column heights.
    pub aggregate_height: i32,
    /// Sum of absolute height differences between neighboring columns.
    pub bumpiness: i32,
}

impl BoardHeuristics {
    /// # Example
    ///
    /// ```
    /// use evotris_engine::BoardHeuristics;
    ///
    /// let h = BoardHeuristics::from_column_heights(&[1, 3, 3, 1, 0, 0, 0, 0, 0, 0]);
    /// assert_eq!(h.aggregate_height, 8);
    /// assert_eq!(h.bumpiness, 5);
    /// ```
    #[must_use]
    pub fn from_column_heights(heights: &ColumnHeights) -> Self {
        Self {
            aggregate_height: heights.iter().sum(),
            bumpiness: heights.windows(2).map(|w| (w[1] - w[0]).abs()).sum(),
        }
    }
}

/// Read-only render data: every visible cell with its display color.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub placed_cells: Vec<(Position, Color)>,
    pub active_cells: Vec<(Position, Color)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardInvariantError {
    #[display("cell {position:?} is shared by pieces {first} and {second}")]
    Overlap {
        position: Position,
        first: PieceId,
        second: PieceId,
    },
    #[display("placed cell {position:?} is outside the board")]
    OutOfBounds { position: Position },
    #[display("occupancy grid does not match the placed pieces")]
    OccupancyMismatch,
    #[display("falling piece {id} overlaps a placed cell")]
    ActiveOverlap { id: PieceId },
}

/// The playing field: placed pieces (and fragments), at most one falling piece, and the
/// occupancy grid used for every collision query.
///
/// The falling piece is kept apart from the grid until it is locked with
/// [`Board::lock_active`]; every move of it is checked against the grid before it is
/// stored. Placed pieces are kept in the order they were locked.
///
/// # Example
///
/// ```
/// use evotris_engine::{Board, PieceKind};
///
/// let mut board = Board::new();
/// board.spawn(PieceKind::O).unwrap();
/// while !board.is_active_landed() {
///     board.drop_active(1);
/// }
/// board.lock_active();
/// assert_eq!(board.column_heights()[4], 19);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Board {
    placed: Vec<Piece>,
    active: Option<Piece>,
    occupancy: Occupancy,
    next_id: u32,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn placed_pieces(&self) -> &[Piece] {
        &self.placed
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    fn allocate_id(&mut self) -> PieceId {
        let id = PieceId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns a falling piece of `kind` at the spawn anchor in spawn orientation.
    pub fn spawn(&mut self, kind: PieceKind) -> Result<PieceId, PlacementError> {
        self.spawn_at(kind, PieceRotation::default(), SPAWN_ANCHOR)
    }

    /// Makes a new falling piece with an explicit rotation and anchor.
    ///
    /// Fails if a cell lies outside the board (including below the floor) or overlaps a
    /// placed cell. Any previous falling piece is discarded.
    pub fn spawn_at(
        &mut self,
        kind: PieceKind,
        rotation: PieceRotation,
        anchor: Position,
    ) -> Result<PieceId, PlacementError> {
        debug_assert!(self.active.is_none(), "spawning over a falling piece");
        let id = self.allocate_id();
        let piece = Piece::new(id, kind, rotation, anchor)?;
        if !piece.cells().iter().all(|pos| pos.is_on_board()) {
            return Err(crate::OutOfBoundsError.into());
        }
        if self.occupancy.intersects(piece.cells(), id) {
            return Err(crate::PieceCollisionError.into());
        }
        self.active = Some(piece);
        Ok(id)
    }

    /// Adds an already-resting piece directly to the placed set.
    pub fn insert_placed(
        &mut self,
        kind: PieceKind,
        rotation: PieceRotation,
        anchor: Position,
    ) -> Result<PieceId, PlacementError> {
        let id = self.allocate_id();
        let piece = Piece::new(id, kind, rotation, anchor)?;
        self.occupancy.occupy(piece.cells(), id)?;
        self.placed.push(piece);
        Ok(id)
    }

    /// Moves the falling piece up to `distance` columns; a rejected move changes nothing.
    pub fn move_active(
        &mut self,
        direction: Direction,
        distance: i8,
    ) -> Result<(), RejectedMoveError> {
        let active = self.active.as_ref().ok_or(RejectedMoveError::NoActivePiece)?;
        let moved = active.moved_horizontally(direction, distance, &self.occupancy)?;
        self.active = Some(moved);
        Ok(())
    }

    /// Rotates the falling piece counterclockwise; a rejected rotation changes nothing.
    pub fn rotate_active_ccw(&mut self) -> Result<(), RejectedMoveError> {
        let active = self.active.as_ref().ok_or(RejectedMoveError::NoActivePiece)?;
        let rotated = active.rotated_ccw(&self.occupancy)?;
        self.active = Some(rotated);
        Ok(())
    }

    /// Returns `true` if there is no falling piece or it is resting.
    #[must_use]
    pub fn is_active_landed(&self) -> bool {
        self.active
            .as_ref()
            .is_none_or(|piece| piece.is_landed(&self.occupancy))
    }

    /// Moves the falling piece down by `distance` rows without a collision check.
    pub fn drop_active(&mut self, distance: i8) {
        debug_assert!(!self.is_active_landed(), "dropping a landed piece");
        if let Some(active) = &mut self.active {
            *active = active.moved_down(distance);
        }
    }

    /// Turns the falling piece into a placed piece. Returns its id.
    pub fn lock_active(&mut self) -> Option<PieceId> {
        let piece = self.active.take()?;
        let id = piece.id();
        let result = self.occupancy.occupy(piece.cells(), id);
        debug_assert!(result.is_ok(), "locked piece {id} cannot be placed: {result:?}");
        self.placed.push(piece);
        Some(id)
    }

    /// Removes every full row of placed cells and returns how many rows were cleared.
    ///
    /// Rows are scanned from the floor upward and identified by absolute coordinate:
    /// removing one row does not shift the cells above it. Use [`Board::settle`] to let
    /// the remaining pieces fall.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        for row in (0..=FLOOR_ROW).rev() {
            if self.occupancy.row_count(row) != BOARD_WIDTH {
                continue;
            }
            for piece in &mut self.placed {
                let removed = piece.remove_cells_in_row(row);
                self.occupancy.vacate(&removed, piece.id());
            }
            cleared += 1;
            trace!(row, "row cleared");
        }
        if cleared > 0 {
            debug!(cleared, "cleared full rows");
        }
        cleared
    }

    /// Drops every placed piece except `exclude` one row at a time until it is resting.
    ///
    /// Passes repeat until a full pass moves nothing, so a fragment that could only fall
    /// after another fragment below it fell also comes to rest on real support.
    /// Returns the total number of single-row drops performed.
    pub fn settle(&mut self, exclude: Option<PieceId>) -> usize {
        let mut drops = 0;
        loop {
            let mut moved = false;
            for piece in &mut self.placed {
                if Some(piece.id()) == exclude {
                    continue;
                }
                while !piece.is_landed(&self.occupancy) {
                    self.occupancy.vacate(piece.cells(), piece.id());
                    *piece = piece.moved_down(1);
                    let result = self.occupancy.occupy(piece.cells(), piece.id());
                    debug_assert!(result.is_ok(), "settling piece overlaps: {result:?}");
                    moved = true;
                    drops += 1;
                }
            }
            if !moved {
                break;
            }
        }
        if drops > 0 {
            debug!(drops, "settled placed pieces");
        }
        drops
    }

    /// Forgets placed pieces that line clears have emptied.
    pub fn remove_empty_fragments(&mut self) -> usize {
        let before = self.placed.len();
        self.placed.retain(|piece| !piece.is_empty());
        before - self.placed.len()
    }

    /// Height of each column: the largest row index among placed cells in that column,
    /// or 0 for an empty column. The falling piece is not counted.
    #[must_use]
    pub fn column_heights(&self) -> ColumnHeights {
        let mut heights = [0; BOARD_WIDTH];
        for pos in self.placed.iter().flat_map(Piece::cells) {
            if let Some(height) = usize::try_from(pos.col())
                .ok()
                .and_then(|col| heights.get_mut(col))
            {
                *height = (*height).max(i32::from(pos.row()));
            }
        }
        heights
    }

    #[must_use]
    pub fn heuristics(&self) -> BoardHeuristics {
        BoardHeuristics::from_column_heights(&self.column_heights())
    }

    /// Encodes the board for an external agent.
    #[must_use]
    pub fn encode(&self) -> AgentObservation {
        AgentObservation::from_board(self)
    }

    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        let cells = |piece: &Piece| {
            let color = piece.color();
            piece
                .cells()
                .iter()
                .filter(|pos| pos.is_visible())
                .map(move |&pos| (pos, color))
                .collect::<Vec<_>>()
        };
        RenderSnapshot {
            placed_cells: self.placed.iter().flat_map(cells).collect(),
            active_cells: self.active.iter().flat_map(cells).collect(),
        }
    }

    /// Verifies that no two placed cells share a position, that the occupancy grid
    /// mirrors the placed pieces, and that the falling piece overlaps nothing.
    pub fn check_invariants(&self) -> Result<(), BoardInvariantError> {
        let mut expected = Occupancy::EMPTY;
        for piece in &self.placed {
            for &position in piece.cells() {
                if let Some(first) = expected.owner_at(position) {
                    return Err(BoardInvariantError::Overlap {
                        position,
                        first,
                        second: piece.id(),
                    });
                }
                expected
                    .occupy(&[position], piece.id())
                    .map_err(|_| BoardInvariantError::OutOfBounds { position })?;
            }
        }
        if expected != self.occupancy {
            return Err(BoardInvariantError::OccupancyMismatch);
        }
        if let Some(active) = &self.active
            && self.occupancy.intersects(active.cells(), active.id())
        {
            return Err(BoardInvariantError::ActiveOverlap { id: active.id() });
        }
        Ok(())
    }
}
