//! Invariants that must hold for any command sequence.
//!
//! - No two placed cells share a position, and the occupancy grid mirrors the pieces,
//!   after every command and after every tick.
//! - After a piece is resolved, every placed piece except the one just locked rests on
//!   the floor or on another piece.

use evotris_engine::{Command, GameSession, PieceSeed};
use proptest::prelude::*;

fn command_strategy() -> impl Strategy<Value = Command> {
    prop::sample::select(Command::ALL.to_vec())
}

proptest! {
    #[test]
    fn random_commands_preserve_board_invariants(
        seed in any::<[u8; 16]>(),
        commands in prop::collection::vec(command_strategy(), 1..600),
    ) {
        let mut session = GameSession::with_seed(PieceSeed::from_bytes(seed));
        for command in commands {
            let falling = session.board().active_piece().map(|piece| piece.id());
            session.apply_command(command);
            prop_assert!(session.board().check_invariants().is_ok());
            session.tick();
            prop_assert!(session.board().check_invariants().is_ok());

            if session.phase().is_spawning() {
                let board = session.board();
                for piece in board.placed_pieces() {
                    if Some(piece.id()) == falling {
                        continue;
                    }
                    prop_assert!(
                        piece.is_landed(board.occupancy()),
                        "piece {} is floating",
                        piece.id()
                    );
                }
            }
            if session.phase().is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn zero_distance_moves_never_change_a_piece(
        seed in any::<[u8; 16]>(),
        commands in prop::collection::vec(command_strategy(), 0..40),
    ) {
        use evotris_engine::Direction;

        let mut session = GameSession::with_seed(PieceSeed::from_bytes(seed));
        for command in commands {
            session.step(command);
        }
        if let Some(active) = session.board().active_piece() {
            let occupancy = session.board().occupancy();
            for direction in [Direction::Left, Direction::Right] {
                let moved = active.moved_horizontally(direction, 0, occupancy);
                prop_assert_eq!(moved.as_ref(), Ok(active));
            }
        }
    }
}
