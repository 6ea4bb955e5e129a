use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    AgentObservation, Board, BoardHeuristics, Direction, RejectedMoveError, RenderSnapshot,
};

use super::{GameStats, PieceGenerator, PieceSeed, RewardConfig, RewardTracker};

/// Phase of the per-session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionPhase {
    /// The next tick spawns a new piece.
    Spawning,
    /// A piece is falling and accepts commands.
    Falling,
    /// The landed piece is being locked and rows cleared.
    ///
    /// Only held inside [`GameSession::tick`]: resolution finishes in the tick that
    /// detects the landing, so callers observe `Spawning` or `GameOver` afterwards.
    Resolving,
    /// Terminal.
    GameOver,
}

/// One action of a player or agent, applied before a tick's gravity step.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::IsVariant,
)]
pub enum Command {
    #[default]
    NoOp,
    MoveLeft,
    MoveRight,
    RotateCcw,
}

impl Command {
    pub const ALL: [Self; 4] = [
        Command::NoOp,
        Command::MoveLeft,
        Command::MoveRight,
        Command::RotateCcw,
    ];

    /// Decodes the index of the strongest agent output.
    ///
    /// Outputs 0, 1 and 2 select left, right and rotate; anything else does nothing.
    ///
    /// ```
    /// use evotris_engine::Command;
    ///
    /// assert_eq!(Command::from_output_index(2), Command::RotateCcw);
    /// assert_eq!(Command::from_output_index(3), Command::NoOp);
    /// ```
    #[must_use]
    pub const fn from_output_index(index: usize) -> Self {
        match index {
            0 => Command::MoveLeft,
            1 => Command::MoveRight,
            2 => Command::RotateCcw,
            _ => Command::NoOp,
        }
    }
}

/// Per-tick values reported to renderers and agents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionMetrics {
    pub aggregate_height: i32,
    pub bumpiness: i32,
    pub lines_cleared_this_tick: usize,
    pub is_game_over: bool,
}

/// A single game: board, piece source, statistics and reward bookkeeping.
///
/// Driven entirely by the caller: each [`GameSession::tick`] advances one discrete step,
/// and commands are applied synchronously between ticks. Sessions share nothing, so any
/// number of them can run side by side on separate threads.
///
/// # Tick
///
/// - `Spawning`: a piece of the next kind appears at the spawn anchor. If it cannot be
///   placed there the game is over.
/// - `Falling`: an unsupported piece drops one row. A resting piece is resolved in the
///   same tick: it is locked, full rows are cleared and the other pieces settle. If the
///   piece came to rest with its anchor above the visible board the game is over,
///   otherwise the next tick spawns.
/// - `GameOver`: ticks do nothing.
///
/// # Example
///
/// ```
/// use evotris_engine::{Command, GameSession, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut session = GameSession::with_seed(seed);
/// while !session.phase().is_game_over() {
///     session.step(Command::NoOp);
/// }
/// assert!(session.metrics().is_game_over);
/// assert!(session.stats().completed_pieces() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    generator: PieceGenerator,
    phase: SessionPhase,
    stats: GameStats,
    reward: RewardTracker,
    heuristics: BoardHeuristics,
    lines_cleared_this_tick: usize,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_generator(PieceGenerator::uniform(seed))
    }

    #[must_use]
    pub fn with_generator(generator: PieceGenerator) -> Self {
        Self {
            board: Board::new(),
            generator,
            phase: SessionPhase::Spawning,
            stats: GameStats::new(),
            reward: RewardTracker::default(),
            heuristics: BoardHeuristics::default(),
            lines_cleared_this_tick: 0,
        }
    }

    #[must_use]
    pub fn with_reward_config(mut self, config: RewardConfig) -> Self {
        self.reward = RewardTracker::new(config);
        self
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn reward(&self) -> &RewardTracker {
        &self.reward
    }

    /// Advances the session by one discrete step.
    pub fn tick(&mut self) {
        if self.phase.is_game_over() {
            return;
        }
        self.stats.increment_tick();
        self.lines_cleared_this_tick = 0;

        match self.phase {
            SessionPhase::Spawning => self.spawn_next(),
            SessionPhase::Falling => {
                if self.board.is_active_landed() {
                    self.phase = SessionPhase::Resolving;
                    self.resolve();
                } else {
                    self.board.drop_active(1);
                }
            }
            SessionPhase::Resolving | SessionPhase::GameOver => {}
        }

        self.heuristics = self.board.heuristics();
        if self.phase.is_game_over() {
            self.reward.record_game_over();
        } else {
            self.reward.record_survival(self.heuristics);
        }
    }

    /// Applies `command` and then advances one tick.
    pub fn step(&mut self, command: Command) {
        self.apply_command(command);
        self.tick();
    }

    /// Applies a command to the falling piece. Rejected commands leave the session
    /// unchanged.
    pub fn apply_command(&mut self, command: Command) {
        let result = match command {
            Command::NoOp => return,
            Command::MoveLeft => self.try_move_left(),
            Command::MoveRight => self.try_move_right(),
            Command::RotateCcw => self.try_rotate_ccw(),
        };
        if let Err(err) = result {
            trace!(?command, %err, "command rejected");
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), RejectedMoveError> {
        self.ensure_falling()?;
        self.board.move_active(Direction::Left, 1)
    }

    pub fn try_move_right(&mut self) -> Result<(), RejectedMoveError> {
        self.ensure_falling()?;
        self.board.move_active(Direction::Right, 1)
    }

    pub fn try_rotate_ccw(&mut self) -> Result<(), RejectedMoveError> {
        self.ensure_falling()?;
        self.board.rotate_active_ccw()
    }

    fn ensure_falling(&self) -> Result<(), RejectedMoveError> {
        if self.phase.is_falling() {
            Ok(())
        } else {
            Err(RejectedMoveError::NoActivePiece)
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        self.board.snapshot()
    }

    #[must_use]
    pub fn encode_for_agent(&self) -> AgentObservation {
        self.board.encode()
    }

    /// Heuristics of the settled board as of the last tick, plus that tick's clears.
    #[must_use]
    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics {
            aggregate_height: self.heuristics.aggregate_height,
            bumpiness: self.heuristics.bumpiness,
            lines_cleared_this_tick: self.lines_cleared_this_tick,
            is_game_over: self.phase.is_game_over(),
        }
    }

    fn spawn_next(&mut self) {
        let kind = self.generator.next_kind();
        match self.board.spawn(kind) {
            Ok(id) => {
                trace!(%id, ?kind, "piece spawned");
                self.phase = SessionPhase::Falling;
            }
            Err(err) => {
                debug!(?kind, %err, "spawn failed");
                self.end_game();
            }
        }
    }

    fn resolve(&mut self) {
        let Some(anchor) = self.board.active_piece().map(|piece| piece.anchor()) else {
            self.phase = SessionPhase::Spawning;
            return;
        };
        let locked = self.board.lock_active();
        let cleared = self.board.clear_lines();
        self.board.settle(locked);
        self.board.remove_empty_fragments();

        self.lines_cleared_this_tick = cleared;
        self.stats.complete_piece_drop(cleared);
        self.reward.record_lines(cleared);

        if anchor.row() < 0 {
            self.end_game();
        } else {
            self.phase = SessionPhase::Spawning;
        }
    }

    fn end_game(&mut self) {
        self.phase = SessionPhase::GameOver;
        debug!(
            ticks = self.stats.ticks(),
            pieces = self.stats.completed_pieces(),
            lines = self.stats.total_cleared_lines(),
            "game over"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceKind, Position};

    fn session_of(kinds: &[PieceKind]) -> GameSession {
        GameSession::with_generator(PieceGenerator::sequence(kinds.iter().copied()))
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut session = session_of(&[PieceKind::T]);
        assert!(session.phase().is_spawning());
        assert!(session.board().active_piece().is_none());

        session.tick();
        assert!(session.phase().is_falling());
        let active = session.board().active_piece().unwrap();
        assert_eq!(active.kind(), PieceKind::T);
        assert_eq!(active.anchor(), Position::new(3, -4));
    }

    #[test]
    fn test_landing_resolves_within_the_tick() {
        let mut session = session_of(&[PieceKind::O]);
        while session.stats().completed_pieces() == 0 {
            session.tick();
            assert!(!session.phase().is_resolving());
        }
        assert!(session.phase().is_spawning());
        assert!(session.board().active_piece().is_none());
    }

    #[test]
    fn test_commands_are_ignored_outside_falling() {
        let mut session = session_of(&[PieceKind::T]);
        assert_eq!(session.try_move_left(), Err(RejectedMoveError::NoActivePiece));
        session.apply_command(Command::RotateCcw);
        assert!(session.board().active_piece().is_none());
    }

    #[test]
    fn test_commands_move_falling_piece() {
        let mut session = session_of(&[PieceKind::O]);
        session.tick();
        session.apply_command(Command::MoveLeft);
        session.apply_command(Command::MoveLeft);
        assert_eq!(session.board().active_piece().unwrap().anchor(), Position::new(1, -4));
        session.apply_command(Command::MoveRight);
        assert_eq!(session.board().active_piece().unwrap().anchor(), Position::new(2, -4));
        session.apply_command(Command::RotateCcw);
        let active = session.board().active_piece().unwrap();
        assert_eq!(active.rotation().index(), 3);
    }

    #[test]
    fn test_piece_lands_and_locks_in_one_tick() {
        let mut session = session_of(&[PieceKind::O]);
        session.tick();
        // Anchor -4 to 17: 21 drops.
        for _ in 0..21 {
            session.tick();
            assert!(session.phase().is_falling());
        }
        assert_eq!(session.board().active_piece().unwrap().anchor(), Position::new(3, 17));

        session.tick();
        assert!(session.phase().is_spawning());
        assert!(session.board().active_piece().is_none());
        assert_eq!(session.board().placed_pieces().len(), 1);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.metrics().aggregate_height, 38);
        assert_eq!(session.metrics().bumpiness, 38);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = session_of(&[PieceKind::O]);
        while !session.phase().is_game_over() {
            session.tick();
        }
        let ticks = session.stats().ticks();
        let reward = session.reward().total();
        session.step(Command::MoveLeft);
        assert_eq!(session.stats().ticks(), ticks);
        assert!((session.reward().total() - reward).abs() < f64::EPSILON);
        assert!(session.metrics().is_game_over);
    }

    #[test]
    fn test_reward_counts_survival_and_penalty() {
        let config = RewardConfig {
            line_clear_reward: 0.0,
            game_over_penalty: 1000.0,
            height_weight: 0.0,
            bumpiness_weight: 0.0,
        };
        let mut session = session_of(&[PieceKind::O]).with_reward_config(config);
        while !session.phase().is_game_over() {
            session.tick();
        }
        #[expect(clippy::cast_precision_loss)]
        let survived = (session.stats().ticks() - 1) as f64;
        assert!((session.reward().total() - (survived - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_output_index_decoding() {
        assert_eq!(Command::from_output_index(0), Command::MoveLeft);
        assert_eq!(Command::from_output_index(1), Command::MoveRight);
        assert_eq!(Command::from_output_index(2), Command::RotateCcw);
        assert_eq!(Command::from_output_index(3), Command::NoOp);
        assert_eq!(Command::from_output_index(usize::MAX), Command::NoOp);
    }
}
