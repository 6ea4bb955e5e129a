//! Playing sessions with an agent and turning them into fitness.

use evotris_engine::{AgentObservation, Command, GameSession, PieceSeed, RewardConfig};
use rand::Rng;
use tracing::trace;

use crate::network::Network;

/// Anything that picks one command per tick from an observation.
pub trait Agent {
    fn decide(&mut self, observation: &AgentObservation) -> Command;
}

impl Agent for &Network {
    fn decide(&mut self, observation: &AgentObservation) -> Command {
        Network::decide(self, observation)
    }
}

/// Agent choosing uniformly among all commands; a baseline without a trained model.
#[derive(Debug)]
pub struct RandomAgent<R> {
    rng: R,
}

impl<R> RandomAgent<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> Agent for RandomAgent<R>
where
    R: Rng,
{
    fn decide(&mut self, _observation: &AgentObservation) -> Command {
        Command::ALL[self.rng.random_range(0..Command::ALL.len())]
    }
}

/// Result of one played session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOutcome {
    /// Total reward collected.
    pub fitness: f64,
    pub ticks: u64,
    pub completed_pieces: usize,
    pub cleared_lines: usize,
    /// `false` if the session was stopped by the tick limit.
    pub game_over: bool,
}

/// Plays one session: every tick the agent sees the board, its command is applied and
/// the session advances. Stops at game over or after `tick_limit` ticks.
pub fn play_session<A>(
    agent: &mut A,
    seed: PieceSeed,
    tick_limit: u64,
    reward: RewardConfig,
) -> SessionOutcome
where
    A: Agent + ?Sized,
{
    let mut session = GameSession::with_seed(seed).with_reward_config(reward);
    while !session.phase().is_game_over() && session.stats().ticks() < tick_limit {
        let command = agent.decide(&session.encode_for_agent());
        session.step(command);
    }
    let stats = session.stats();
    let outcome = SessionOutcome {
        fitness: session.reward().total(),
        ticks: stats.ticks(),
        completed_pieces: stats.completed_pieces(),
        cleared_lines: stats.total_cleared_lines(),
        game_over: session.phase().is_game_over(),
    };
    trace!(?outcome, "session finished");
    outcome
}

/// Fitness function: plays the same seeds for every individual and averages the
/// rewards, so individuals of one generation are compared on identical pieces.
#[derive(Debug, Clone)]
pub struct SessionEvaluator {
    seeds: Vec<PieceSeed>,
    tick_limit: u64,
    reward: RewardConfig,
}

impl SessionEvaluator {
    #[must_use]
    pub fn new(seeds: Vec<PieceSeed>, tick_limit: u64, reward: RewardConfig) -> Self {
        Self {
            seeds,
            tick_limit,
            reward,
        }
    }

    #[must_use]
    pub fn seeds(&self) -> &[PieceSeed] {
        &self.seeds
    }

    /// Mean session reward of `network` over all seeds (0 without seeds).
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, network: &Network) -> f32 {
        if self.seeds.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .seeds
            .iter()
            .map(|&seed| play_session(&mut &*network, seed, self.tick_limit, self.reward).fitness)
            .sum();
        (total / self.seeds.len() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::network::NetworkLayout;

    fn seed(n: u8) -> PieceSeed {
        PieceSeed::from_bytes([n; 16])
    }

    #[test]
    fn test_session_stops_at_tick_limit() {
        let mut agent = RandomAgent::new(StdRng::seed_from_u64(1));
        let outcome = play_session(&mut agent, seed(1), 10, RewardConfig::default());
        assert_eq!(outcome.ticks, 10);
        assert!(!outcome.game_over);
        assert!(outcome.fitness > 0.0);
    }

    #[test]
    fn test_idle_network_plays_until_game_over() {
        let layout = NetworkLayout::for_agent(1);
        let network = Network::from_genome(layout, vec![0.0; layout.genome_len()]).unwrap();
        // All outputs tie, so the first one (move left) is chosen every tick.
        let outcome = play_session(&mut &network, seed(2), 100_000, RewardConfig::default());
        assert!(outcome.game_over);
        assert!(outcome.completed_pieces > 0);
        assert!(outcome.ticks < 100_000);
    }

    #[test]
    fn test_evaluation_is_deterministic_per_seed() {
        let layout = NetworkLayout::for_agent(4);
        let mut rng = StdRng::seed_from_u64(3);
        let genome = crate::weights::random(&mut rng, 1.0, layout.genome_len());
        let network = Network::from_genome(layout, genome).unwrap();

        let evaluator = SessionEvaluator::new(vec![seed(4), seed(5)], 500, RewardConfig::default());
        let first = evaluator.evaluate(&network);
        let second = evaluator.evaluate(&network);
        assert!((first - second).abs() < f32::EPSILON);
    }
}
