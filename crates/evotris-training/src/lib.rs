//! Neuroevolution of agents that play the falling-block engine.
//!
//! Each individual is the flat weight genome of a small fixed-topology network. The
//! network reads the agent encoding of the board every tick and picks one command; the
//! reward collected by the session is the individual's fitness.
//!
//! # How Training Works
//!
//! 1. **Population** - Create individuals with random weights
//! 2. **Evaluation** - Each individual plays the generation's sessions (same seeds for all)
//! 3. **Fitness** - Mean session reward: survival on a low, flat stack, line clears, and
//!    a penalty for topping out
//! 4. **Reproduction** - Elites, tournament selection, BLX-α crossover, Gaussian mutation
//! 5. **Repeat** - Continue for the configured number of generations
//!
//! # Architecture
//!
//! ```text
//! Genetic Algorithm (genetic)
//!     ↓ evolves
//! Network genomes (network)
//!     ↓ play
//! GameSession (evotris-engine)
//!     ↓ rewards
//! Fitness (evaluation)
//!     ↓ guides
//! Selection & Reproduction
//! ```
//!
//! # Current Limitations
//!
//! - **Fixed topology**: only the weights evolve; the number of hidden neurons is a
//!   configuration value.
//! - **Noisy fitness**: a handful of random piece sequences per generation, so fitness
//!   varies between generations even for an unchanged elite.

pub mod config;
pub mod evaluation;
pub mod genetic;
pub mod network;
pub mod stats;
pub mod weights;
