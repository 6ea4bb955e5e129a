use std::{num::NonZeroU64, path::PathBuf};

use evotris_engine::{AgentObservation, CellState, GameSession, PieceSeed};
use evotris_training::evaluation::{Agent, RandomAgent};
use rand::Rng as _;
use tracing::info;

use crate::{model::network_model::NetworkModel, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Trained model (JSON); a random agent plays without one
    #[arg(long)]
    model: Option<PathBuf>,
    /// Piece sequence seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Stop after this many ticks
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,
    /// Print the board every N ticks
    #[arg(long)]
    show_every: Option<NonZeroU64>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let network = arg
        .model
        .as_ref()
        .map(|path| {
            let model: NetworkModel = util::read_json_file("network model", path)?;
            info!(name = %model.name, fitness = model.final_fitness, "model loaded");
            model.to_network()
        })
        .transpose()?;
    let mut random_agent = RandomAgent::new(rand::rng());
    let mut network_agent = network.as_ref();
    let agent: &mut dyn Agent = match &mut network_agent {
        Some(network) => network,
        None => &mut random_agent,
    };

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    info!(%seed, "session started");

    let mut session = GameSession::with_seed(seed);
    while !session.phase().is_game_over() && session.stats().ticks() < arg.ticks {
        let command = agent.decide(&session.encode_for_agent());
        session.step(command);
        if let Some(every) = arg.show_every
            && session.stats().ticks() % every.get() == 0
        {
            println!("tick {}", session.stats().ticks());
            print!("{}", render_board(&session.encode_for_agent()));
        }
    }

    print!("{}", render_board(&session.encode_for_agent()));
    print_summary(&session, seed);
    Ok(())
}

/// Text view of the visible board: `.` empty, `#` placed, `@` falling.
fn render_board(observation: &AgentObservation) -> String {
    let mut out = String::new();
    for row in observation.grid() {
        for cell in row {
            out.push(match cell {
                CellState::Empty => '.',
                CellState::Placed => '#',
                CellState::Active => '@',
            });
        }
        out.push('\n');
    }
    out
}

fn print_summary(session: &GameSession, seed: PieceSeed) {
    let stats = session.stats();
    let metrics = session.metrics();
    let line_clears = stats
        .line_cleared_counter()
        .iter()
        .enumerate()
        .map(|(lines, count)| format!("{lines}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    println!();
    println!("Seed: {seed}");
    println!("Game over: {}", metrics.is_game_over);
    println!("Ticks: {}", stats.ticks());
    println!("Pieces: {}", stats.completed_pieces());
    println!("Cleared lines: {} ({line_clears})", stats.total_cleared_lines());
    println!("Reward: {:.3}", session.reward().total());
    println!(
        "Aggregate height: {}, bumpiness: {}",
        metrics.aggregate_height, metrics.bumpiness
    );
}

#[cfg(test)]
mod tests {
    use evotris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Command};

    use super::*;

    #[test]
    fn test_empty_board_renders_as_dots() {
        let text = render_board(&GameSession::new().encode_for_agent());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), BOARD_HEIGHT);
        assert!(lines.iter().all(|line| *line == ".".repeat(BOARD_WIDTH)));
    }

    #[test]
    fn test_landed_pieces_render_as_hashes() {
        let seed = PieceSeed::from_bytes([9; 16]);
        let mut session = GameSession::with_seed(seed);
        while session.stats().completed_pieces() == 0 {
            session.step(Command::NoOp);
        }
        let text = render_board(&session.encode_for_agent());
        assert!(text.contains('#'));
        assert!(!text.contains('@'));
    }
}
