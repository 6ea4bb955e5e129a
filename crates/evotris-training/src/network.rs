//! Fixed-topology feed-forward network used as the agent controller.
//!
//! The network maps an [`AgentObservation`] input vector to one output per
//! [`Command`]; the strongest output selects the command for the tick.
//!
//! ```text
//! input (207) ── dense + tanh ──▶ hidden ── dense ──▶ output (4)
//! ```

use evotris_engine::{AgentObservation, Command};
use serde::{Deserialize, Serialize};

/// Number of network outputs: left, right, rotate, nothing.
pub const OUTPUT_LEN: usize = Command::ALL.len();

/// Layer sizes of a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl NetworkLayout {
    /// Layout reading an agent observation and producing one value per command.
    #[must_use]
    pub const fn for_agent(hidden: usize) -> Self {
        Self {
            inputs: AgentObservation::INPUT_LEN,
            hidden,
            outputs: OUTPUT_LEN,
        }
    }

    /// Number of weights (including one bias per neuron) in a genome of this layout.
    ///
    /// ```
    /// use evotris_training::network::NetworkLayout;
    ///
    /// let layout = NetworkLayout { inputs: 3, hidden: 2, outputs: 1 };
    /// assert_eq!(layout.genome_len(), (3 + 1) * 2 + (2 + 1) * 1);
    /// ```
    #[must_use]
    pub const fn genome_len(&self) -> usize {
        (self.inputs + 1) * self.hidden + (self.hidden + 1) * self.outputs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("genome has {actual} weights, but the layout needs {expected}")]
pub struct GenomeLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// A two-layer network whose weights are a flat genome.
///
/// Genome order: for each hidden neuron its input weights followed by its bias, then
/// for each output neuron its hidden weights followed by its bias.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layout: NetworkLayout,
    genome: Vec<f32>,
}

impl Network {
    pub fn from_genome(layout: NetworkLayout, genome: Vec<f32>) -> Result<Self, GenomeLengthError> {
        if genome.len() != layout.genome_len() {
            return Err(GenomeLengthError {
                expected: layout.genome_len(),
                actual: genome.len(),
            });
        }
        Ok(Self { layout, genome })
    }

    #[must_use]
    pub fn layout(&self) -> NetworkLayout {
        self.layout
    }

    #[must_use]
    pub fn genome(&self) -> &[f32] {
        &self.genome
    }

    /// Computes the output layer for `input`.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not match the layout's input width.
    #[must_use]
    pub fn activate(&self, input: &[f32]) -> Vec<f32> {
        let NetworkLayout {
            inputs,
            hidden,
            outputs,
        } = self.layout;
        assert_eq!(input.len(), inputs, "input width mismatch");

        let (hidden_weights, output_weights) = self.genome.split_at((inputs + 1) * hidden);
        let hidden_values: Vec<f32> = hidden_weights
            .chunks_exact(inputs + 1)
            .map(|neuron| dense(neuron, input).tanh())
            .collect();
        output_weights
            .chunks_exact(hidden + 1)
            .take(outputs)
            .map(|neuron| dense(neuron, &hidden_values))
            .collect()
    }

    /// Chooses the command for the current tick.
    #[must_use]
    pub fn decide(&self, observation: &AgentObservation) -> Command {
        let outputs = self.activate(&observation.to_input_vector());
        argmax(&outputs).map_or(Command::NoOp, Command::from_output_index)
    }
}

/// Weighted sum of `values` plus bias; the bias is the last element of `neuron`.
fn dense(neuron: &[f32], values: &[f32]) -> f32 {
    let (weights, bias) = neuron.split_at(values.len());
    let sum: f32 = weights.iter().zip(values).map(|(w, v)| w * v).sum();
    sum + bias.iter().sum::<f32>()
}

/// Index of the largest value; the first one wins ties. `None` for an empty slice.
///
/// ```
/// use evotris_training::network::argmax;
///
/// assert_eq!(argmax(&[0.1, 0.7, 0.7, -1.0]), Some(1));
/// assert_eq!(argmax(&[]), None);
/// ```
#[must_use]
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, max)) if v <= max => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use evotris_engine::Board;

    use super::*;

    fn tiny_network() -> Network {
        let layout = NetworkLayout {
            inputs: 2,
            hidden: 1,
            outputs: 2,
        };
        // hidden: tanh(1*x0 + 0*x1 + 0)
        // out0: 2*h + 0, out1: -1*h + 0.5
        Network::from_genome(layout, vec![1.0, 0.0, 0.0, 2.0, 0.0, -1.0, 0.5]).unwrap()
    }

    #[test]
    fn test_activate_computes_two_layers() {
        let network = tiny_network();
        let out = network.activate(&[0.0, 5.0]);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);

        let out = network.activate(&[10.0, 0.0]);
        let h = 10.0_f32.tanh();
        assert!((out[0] - 2.0 * h).abs() < 1e-6);
        assert!((out[1] - (0.5 - h)).abs() < 1e-6);
    }

    #[test]
    fn test_genome_length_is_checked() {
        let layout = NetworkLayout::for_agent(8);
        let err = Network::from_genome(layout, vec![0.0; 10]).unwrap_err();
        assert_eq!(err.expected, 208 * 8 + 9 * 4);
        assert_eq!(err.actual, 10);
    }

    #[test]
    fn test_bias_only_network_picks_strongest_output() {
        let layout = NetworkLayout::for_agent(2);
        let mut genome = vec![0.0; layout.genome_len()];
        // Output biases are the last weight of each output neuron.
        let output_start = (layout.inputs + 1) * layout.hidden;
        for (k, bias) in [0.1, 0.2, 0.9, 0.3].into_iter().enumerate() {
            genome[output_start + k * (layout.hidden + 1) + layout.hidden] = bias;
        }
        let network = Network::from_genome(layout, genome).unwrap();

        let observation = Board::new().encode();
        assert_eq!(network.decide(&observation), Command::RotateCcw);
    }

    #[test]
    fn test_argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[1.0, 1.0]), Some(0));
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some(1));
    }
}
