//! Genetic algorithm evolving network genomes.
//!
//! The cycle per generation:
//!
//! 1. **Evaluate Fitness** - Each individual plays the generation's sessions
//! 2. **Elite Selection** - Top performers are copied unchanged
//! 3. **Tournament Selection** - Parents are the best of `tournament_size` random picks
//! 4. **Crossover (BLX-α)** - Two parent genomes are blended into a child
//! 5. **Mutation** - Gaussian noise is added to some weights of the child
//!
//! # Parallelization
//!
//! Fitness evaluation runs one scoped thread per individual. Every thread builds its
//! own sessions; the only shared data is the read-only evaluator.
//!
//! # Example
//!
//! ```
//! use evotris_engine::RewardConfig;
//! use evotris_training::{
//!     config::TrainingConfig,
//!     evaluation::SessionEvaluator,
//!     genetic::{Population, PopulationEvolver},
//!     network::NetworkLayout,
//! };
//! use rand::Rng as _;
//!
//! let config = TrainingConfig {
//!     population_size: 4,
//!     tournament_size: 2,
//!     hidden_neurons: 2,
//!     ..TrainingConfig::default()
//! };
//! let mut rng = rand::rng();
//! let mut population = Population::random(
//!     NetworkLayout::for_agent(config.hidden_neurons),
//!     config.population_size,
//!     &mut rng,
//!     config.max_weight,
//! );
//! let evolver = PopulationEvolver::from_config(&config).unwrap();
//!
//! for _generation in 0..2 {
//!     let evaluator = SessionEvaluator::new(vec![rng.random()], 50, RewardConfig::default());
//!     population.evaluate_fitness(&evaluator);
//!     population = evolver.evolve(&population);
//! }
//! ```

use std::thread;

use rand::{Rng, seq::IndexedRandom};
use rand_distr::Normal;
use tracing::debug;

use crate::{
    config::{ConfigError, TrainingConfig},
    evaluation::SessionEvaluator,
    network::{Network, NetworkLayout},
    stats::FitnessStats,
    weights,
};

/// A candidate network genome and its fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    genome: Vec<f32>,
    fitness: f32,
}

impl Individual {
    /// Creates an individual with weights uniform in `[-max_weight, max_weight]`.
    pub fn random<R>(rng: &mut R, max_weight: f32, genome_len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            genome: weights::random(rng, max_weight, genome_len),
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn genome(&self) -> &[f32] {
        &self.genome
    }

    /// Mean session reward from the last evaluation; higher is better.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// Individuals sharing one network layout.
#[derive(Debug, Clone)]
pub struct Population {
    layout: NetworkLayout,
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn random<R>(layout: NetworkLayout, count: usize, rng: &mut R, max_weight: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, max_weight, layout.genome_len()))
            .collect();
        Population {
            layout,
            individuals,
        }
    }

    #[must_use]
    pub fn layout(&self) -> NetworkLayout {
        self.layout
    }

    /// Individuals, best first after [`Population::evaluate_fitness`].
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Builds the network of `individual`.
    #[must_use]
    pub fn network(&self, individual: &Individual) -> Option<Network> {
        Network::from_genome(self.layout, individual.genome.clone()).ok()
    }

    /// Evaluates every individual in parallel, then sorts by fitness, best first.
    pub fn evaluate_fitness(&mut self, evaluator: &SessionEvaluator) {
        let layout = self.layout;
        thread::scope(|s| {
            for (i, ind) in self.individuals.iter_mut().enumerate() {
                s.spawn(move || {
                    ind.fitness = match Network::from_genome(layout, ind.genome.clone()) {
                        Ok(network) => evaluator.evaluate(&network),
                        Err(_) => f32::MIN,
                    };
                    debug!(individual = i, fitness = ind.fitness, "individual evaluated");
                });
            }
        });

        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Controls how one generation becomes the next.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of top individuals preserved unchanged (elitism)
    pub elite_count: usize,
    /// Weights are clamped to `[-max_weight, max_weight]`
    pub max_weight: f32,
    /// Tournament size for selection (larger = stronger selection pressure)
    pub tournament_size: usize,
    /// Gaussian noise added by mutation
    pub mutation_noise: Normal<f32>,
    /// BLX-α crossover parameter
    pub blx_alpha: f32,
    /// Probability of mutating each weight
    pub mutation_rate: f32,
}

impl PopulationEvolver {
    pub fn from_config(config: &TrainingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mutation_noise = Normal::new(0.0, config.mutation_sigma).map_err(|_| {
            ConfigError::InvalidMutationSigma {
                value: config.mutation_sigma,
            }
        })?;
        Ok(Self {
            elite_count: config.elite_count,
            max_weight: config.max_weight,
            tournament_size: config.tournament_size,
            mutation_noise,
            blx_alpha: config.blx_alpha,
            mutation_rate: config.mutation_rate,
        })
    }

    /// Creates the next generation, the same size as `population`.
    ///
    /// `population` must be sorted best first, as left by
    /// [`Population::evaluate_fitness`].
    #[must_use]
    pub fn evolve(&self, population: &Population) -> Population {
        let mut rng = rand::rng();
        let individuals = &population.individuals;
        debug_assert!(individuals.is_sorted_by(|a, b| a.fitness >= b.fitness));

        let elite_count = self.elite_count.min(individuals.len());
        let mut next_individuals = Vec::with_capacity(individuals.len());
        next_individuals.extend(individuals[..elite_count].iter().cloned());

        while next_individuals.len() < individuals.len() {
            let (Some(p1), Some(p2)) = (
                tournament_select(individuals, self.tournament_size, &mut rng),
                tournament_select(individuals, self.tournament_size, &mut rng),
            ) else {
                break;
            };

            let mut child = weights::blx_alpha(
                &p1.genome,
                &p2.genome,
                self.blx_alpha,
                self.max_weight,
                &mut rng,
            );
            weights::mutate(
                &mut child,
                self.mutation_noise,
                self.max_weight,
                self.mutation_rate,
                &mut rng,
            );

            next_individuals.push(Individual {
                genome: child,
                fitness: f32::MIN,
            });
        }

        Population {
            layout: population.layout,
            individuals: next_individuals,
        }
    }
}

/// Picks `tournament_size` distinct individuals at random and returns the fittest.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size.max(1))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
}
