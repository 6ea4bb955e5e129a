use evotris_engine::RewardConfig;
use serde::{Deserialize, Serialize};

/// Parameters of a training run. Every field has a default, so a JSON file only needs
/// the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Sessions played by each individual per generation; fitness is their mean.
    pub games_per_individual: usize,
    /// Sessions still running after this many ticks are stopped.
    pub tick_limit: u64,
    pub hidden_neurons: usize,
    /// Top individuals copied unchanged into the next generation.
    pub elite_count: usize,
    pub tournament_size: usize,
    pub max_weight: f32,
    /// Probability of mutating each weight of a child.
    pub mutation_rate: f32,
    pub mutation_sigma: f32,
    pub blx_alpha: f32,
    pub reward: RewardConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 250,
            games_per_individual: 3,
            tick_limit: 5000,
            hidden_neurons: 16,
            elite_count: 2,
            tournament_size: 3,
            max_weight: 2.0,
            mutation_rate: 0.1,
            mutation_sigma: 0.3,
            blx_alpha: 0.5,
            reward: RewardConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("at least one generation is required")]
    NoGenerations,
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("tournament size must be between 1 and the population size")]
    InvalidTournamentSize,
    #[display("games per individual must be at least 1")]
    NoGames,
    #[display("hidden layer must have at least one neuron")]
    EmptyHiddenLayer,
    #[display("max weight must be positive and finite, got {value}")]
    InvalidMaxWeight { value: f32 },
    #[display("mutation rate must lie in [0, 1], got {value}")]
    InvalidMutationRate { value: f32 },
    #[display("mutation sigma must be non-negative and finite, got {value}")]
    InvalidMutationSigma { value: f32 },
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(ConfigError::InvalidTournamentSize);
        }
        if self.games_per_individual == 0 {
            return Err(ConfigError::NoGames);
        }
        if self.hidden_neurons == 0 {
            return Err(ConfigError::EmptyHiddenLayer);
        }
        if !(self.max_weight.is_finite() && self.max_weight > 0.0) {
            return Err(ConfigError::InvalidMaxWeight { value: self.max_weight });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate { value: self.mutation_rate });
        }
        if !(self.mutation_sigma.is_finite() && self.mutation_sigma >= 0.0) {
            return Err(ConfigError::InvalidMutationSigma { value: self.mutation_sigma });
        }
        Ok(())
    }
}
