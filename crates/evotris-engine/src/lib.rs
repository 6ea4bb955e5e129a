pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A cell computed for a piece lies outside the board.
///
/// Raised when a rotation state would push a cell below the floor (row 19) or when a
/// piece is inserted with cells outside the visible board and its spawn buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece cell out of bounds")]
pub struct OutOfBoundsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with a placed cell")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("cannot place piece: {_0}")]
    OutOfBounds(OutOfBoundsError),
    #[display("cannot place piece: {_0}")]
    Collision(PieceCollisionError),
}

impl From<OutOfBoundsError> for PlacementError {
    fn from(err: OutOfBoundsError) -> Self {
        Self::OutOfBounds(err)
    }
}

impl From<PieceCollisionError> for PlacementError {
    fn from(err: PieceCollisionError) -> Self {
        Self::Collision(err)
    }
}

/// A move or rotation command that left the board unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum RejectedMoveError {
    #[display("no falling piece to move")]
    NoActivePiece,
    #[display("move would leave the board")]
    OutOfBounds,
    #[display("move would collide with a placed cell")]
    Collision,
}
