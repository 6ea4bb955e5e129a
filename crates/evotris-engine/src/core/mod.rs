//! Grid geometry, pieces and the board.
//!
//! Everything here is pure simulation data: no timing, no randomness and no
//! rendering. [`GameSession`](crate::GameSession) drives these types one tick at a
//! time.

pub use self::{board::*, encoder::*, geometry::*, occupancy::*, piece::*, piece_kind::*, position::*};

mod board;
mod encoder;
mod geometry;
mod occupancy;
mod piece;
mod piece_kind;
mod position;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of visible rows on the board.
pub const BOARD_HEIGHT: usize = 20;
/// Rows above the visible board where new pieces appear (rows `-4..0`).
pub const SPAWN_BUFFER_ROWS: usize = 4;
/// Total rows tracked for collision: spawn buffer plus visible board.
pub const TOTAL_ROWS: usize = SPAWN_BUFFER_ROWS + BOARD_HEIGHT;

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const LAST_COLUMN: i8 = BOARD_WIDTH as i8 - 1;
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const FLOOR_ROW: i8 = BOARD_HEIGHT as i8 - 1;
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const TOP_ROW: i8 = -(SPAWN_BUFFER_ROWS as i8);
