/// A 4×4 occupancy matrix stored as a 16-bit mask.
///
/// Bit `row * 4 + col` is set when the cell at (`col`, `row`) of the bounding box is
/// occupied. Matrices are immutable values; rotation returns a new matrix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix(u16);

impl ShapeMatrix {
    pub const SIZE: usize = 4;
    pub const EMPTY: Self = Self(0);

    /// Builds a matrix from rows of `0`/`1` flags (row 0 is the top row).
    #[must_use]
    pub const fn from_rows(rows: [[u8; 4]; 4]) -> Self {
        let mut bits = 0;
        let mut row = 0;
        while row < Self::SIZE {
            let mut col = 0;
            while col < Self::SIZE {
                if rows[row][col] != 0 {
                    bits |= Self::bit(col, row);
                }
                col += 1;
            }
            row += 1;
        }
        Self(bits)
    }

    const fn bit(col: usize, row: usize) -> u16 {
        1 << (row * Self::SIZE + col)
    }

    #[must_use]
    pub const fn is_set(self, col: usize, row: usize) -> bool {
        self.0 & Self::bit(col, row) != 0
    }

    #[must_use]
    pub const fn cell_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Rotates the matrix 90° clockwise.
    ///
    /// Equivalent to transposing the row-reversed matrix:
    /// `rotated[row][col] = self[3 - col][row]`.
    #[must_use]
    pub const fn rotated(self) -> Self {
        let mut bits = 0;
        let mut row = 0;
        while row < Self::SIZE {
            let mut col = 0;
            while col < Self::SIZE {
                if self.is_set(row, Self::SIZE - 1 - col) {
                    bits |= Self::bit(col, row);
                }
                col += 1;
            }
            row += 1;
        }
        Self(bits)
    }

    /// Occupied cells as `(col, row)` offsets, scanned in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..Self::SIZE).flat_map(move |row| {
            (0..Self::SIZE).filter_map(move |col| self.is_set(col, row).then_some((col, row)))
        })
    }

    fn is_column_occupied(self, col: usize) -> bool {
        (0..Self::SIZE).any(|row| self.is_set(col, row))
    }

    /// Index of the leftmost column containing an occupied cell.
    #[must_use]
    pub fn leading_column(self) -> Option<usize> {
        (0..Self::SIZE).find(|&col| self.is_column_occupied(col))
    }

    /// Index of the rightmost column containing an occupied cell.
    #[must_use]
    pub fn trailing_column(self) -> Option<usize> {
        (0..Self::SIZE).rev().find(|&col| self.is_column_occupied(col))
    }
}

/// Returns `matrix` rotated 90° clockwise.
#[must_use]
pub const fn rotate(matrix: ShapeMatrix) -> ShapeMatrix {
    matrix.rotated()
}

/// Rotation index of a piece.
///
/// Selects one of the four precomputed [`RotationStates`]. State `k` is the canonical
/// matrix rotated clockwise `k` times, so decrementing the index turns the piece
/// counterclockwise. All arithmetic wraps modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_ccw(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The four occupancy matrices of a piece, computed once from its canonical matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationStates([ShapeMatrix; 4]);

impl RotationStates {
    /// `state[0]` is `canonical`; `state[k]` is `rotate(state[k - 1])`.
    #[must_use]
    pub const fn new(canonical: ShapeMatrix) -> Self {
        let mut states = [canonical; 4];
        let mut k = 1;
        while k < 4 {
            states[k] = rotate(states[k - 1]);
            k += 1;
        }
        Self(states)
    }

    #[must_use]
    pub const fn get(&self, rotation: PieceRotation) -> ShapeMatrix {
        self.0[rotation.as_usize()]
    }

    #[must_use]
    pub const fn canonical(&self) -> ShapeMatrix {
        self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeMatrix> + '_ {
        self.0.iter().copied()
    }
}
