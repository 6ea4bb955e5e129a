use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::geometry::{RotationStates, ShapeMatrix};

/// An RGB display color. Carried by pieces for renderers; never used in game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Enum representing the type of piece.
///
/// The discriminant is the index used by the agent encoding's one-hot vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

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
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            PieceKind::I => Color::new(0, 240, 240),
            PieceKind::J => Color::new(0, 0, 240),
            PieceKind::L => Color::new(240, 160, 0),
            PieceKind::O => Color::new(240, 240, 0),
            PieceKind::S => Color::new(0, 240, 0),
            PieceKind::T => Color::new(160, 0, 240),
            PieceKind::Z => Color::new(240, 0, 0),
        }
    }

    /// The spawn orientation of this piece within its 4×4 bounding box.
    #[must_use]
    pub const fn canonical_shape(self) -> ShapeMatrix {
        CANONICAL_SHAPES[self as usize]
    }

    /// Computes the four rotation states from the canonical shape.
    #[must_use]
    pub const fn rotation_states(self) -> RotationStates {
        RotationStates::new(self.canonical_shape())
    }
}

const CANONICAL_SHAPES: [ShapeMatrix; PieceKind::LEN] = {
    const fn m(rows: [[u8; 4]; 4]) -> ShapeMatrix {
        ShapeMatrix::from_rows(rows)
    }
    const EEEE: [u8; 4] = [0; 4];
    [
        // I-piece
        m([EEEE, EEEE, [1, 1, 1, 1], EEEE]),
        // J-piece
        m([EEEE, [0, 1, 0, 0], [0, 1, 1, 1], EEEE]),
        // L-piece
        m([EEEE, [0, 0, 1, 0], [1, 1, 1, 0], EEEE]),
        // O-piece
        m([EEEE, [0, 1, 1, 0], [0, 1, 1, 0], EEEE]),
        // S-piece
        m([EEEE, [0, 1, 1, 0], [1, 1, 0, 0], EEEE]),
        // T-piece
        m([EEEE, [0, 1, 0, 0], [1, 1, 1, 0], EEEE]),
        // Z-piece
        m([EEEE, [0, 1, 1, 0], [0, 0, 1, 1], EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::geometry::rotate;

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            for state in kind.rotation_states().iter() {
                assert_eq!(state.cell_count(), 4, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_four_rotations_reproduce_canonical_shape() {
        for kind in PieceKind::ALL {
            let canonical = kind.canonical_shape();
            let rotated = rotate(rotate(rotate(rotate(canonical))));
            assert_eq!(rotated, canonical, "{kind:?}");
        }
    }

    #[test]
    fn test_index_round_trip() {
        for (i, kind) in PieceKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(kind));
        }
        assert_eq!(PieceKind::from_index(PieceKind::LEN), None);
    }

    #[test]
    fn test_uniform_sampling_reaches_every_kind() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            let kind: PieceKind = rng.random();
            seen[kind.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
