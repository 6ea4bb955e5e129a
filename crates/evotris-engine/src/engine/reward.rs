use serde::{Deserialize, Serialize};

use crate::BoardHeuristics;

/// Weights of the reward signal given to a training agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward per cleared row.
    pub line_clear_reward: f64,
    /// Subtracted once when the session ends.
    pub game_over_penalty: f64,
    pub height_weight: f64,
    pub bumpiness_weight: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            line_clear_reward: 150.0,
            game_over_penalty: 50.0,
            height_weight: 0.5,
            bumpiness_weight: 0.18,
        }
    }
}

impl RewardConfig {
    /// Reward for surviving one tick on a board of the given shape.
    ///
    /// Lies in `(0, 1]`: a flat, empty board earns 1, tall or rugged stacks earn less.
    #[must_use]
    pub fn survival_reward(&self, heuristics: BoardHeuristics) -> f64 {
        let penalty = self.height_weight * f64::from(heuristics.aggregate_height)
            + self.bumpiness_weight * f64::from(heuristics.bumpiness);
        1.0 / (penalty + 1.0)
    }
}

/// Accumulated reward of one session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RewardTracker {
    config: RewardConfig,
    total: f64,
}

impl RewardTracker {
    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self { config, total: 0.0 }
    }

    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn record_lines(&mut self, cleared: usize) {
        self.total += self.config.line_clear_reward * cleared as f64;
    }

    pub(crate) fn record_survival(&mut self, heuristics: BoardHeuristics) {
        self.total += self.config.survival_reward(heuristics);
    }

    pub(crate) fn record_game_over(&mut self) {
        self.total -= self.config.game_over_penalty;
    }
}
