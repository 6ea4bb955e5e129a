//! Session logic driving the core board one tick at a time.
//!
//! - [`GameSession`] - The per-session state machine and command surface
//! - [`PieceGenerator`] - Uniform random or fixed-sequence piece source
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameStats`] - Ticks, locked pieces and line clears
//! - [`RewardTracker`] - Reward signal for training agents
//!
//! # Example
//!
//! ```
//! use evotris_engine::{Command, GameSession};
//!
//! let mut session = GameSession::new();
//!
//! // One command per tick, applied before gravity
//! session.step(Command::MoveLeft);
//! session.step(Command::RotateCcw);
//!
//! let observation = session.encode_for_agent();
//! let metrics = session.metrics();
//! # let _ = (observation, metrics);
//! ```

pub use self::{game_session::*, game_stats::*, piece_generator::*, reward::*};

mod game_session;
mod game_stats;
mod piece_generator;
mod reward;
