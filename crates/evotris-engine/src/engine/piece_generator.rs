use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number generator of
/// a [`PieceGenerator`]. Using the same seed produces the same sequence of pieces,
/// enabling:
///
/// - Reproducible sessions for debugging
/// - Fair comparison of agents on identical piece sequences
/// - Deterministic testing
///
/// Seeds are written as 32-character hex strings, both in JSON and on the command line.
///
/// # Example
///
/// ```
/// use evotris_engine::{GameSession, PieceSeed};
/// use rand::Rng as _;
///
/// // Generate a random seed
/// let seed: PieceSeed = rand::rng().random();
///
/// // Both sessions will see the same piece sequence
/// let session1 = GameSession::with_seed(seed);
/// let session2 = GameSession::with_seed(seed);
/// # let _ = (session1, session2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: {reason}")]
pub struct ParsePieceSeedError {
    reason: String,
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParsePieceSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParsePieceSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Supplies the kind of every spawned piece.
///
/// The default source draws each kind independently and uniformly at random. A fixed
/// sequence source replays a list of kinds cyclically, which makes scenarios exact.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Uniform(Pcg32),
    Sequence { kinds: Vec<PieceKind>, next: usize },
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a uniform generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::uniform(rand::rng().random())
    }

    #[must_use]
    pub fn uniform(seed: PieceSeed) -> Self {
        Self {
            source: Source::Uniform(Pcg32::from_seed(seed.0)),
        }
    }

    /// Creates a generator that yields `kinds` in order, starting over after the last.
    ///
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn sequence(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self {
            source: Source::Sequence { kinds, next: 0 },
        }
    }

    pub fn next_kind(&mut self) -> PieceKind {
        match &mut self.source {
            Source::Uniform(rng) => rng.random(),
            Source::Sequence { kinds, next } => {
                let kind = kinds[*next];
                *next = (*next + 1) % kinds.len();
                kind
            }
        }
    }
}
