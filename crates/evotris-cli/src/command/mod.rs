use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::prelude::*;

use self::{auto_play::AutoPlayArg, train::TrainArg};

mod auto_play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a network agent with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Let a trained network (or a random agent) play one session
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);

    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}

/// Logs go to stderr so that stdout stays free for boards and JSON output.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_verbose_flag_counts_after_subcommand() {
        let args = CommandArgs::try_parse_from(["evotris", "auto-play", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.mode, Mode::AutoPlay(_)));
    }
}
