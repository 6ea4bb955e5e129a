use anyhow::Context;
use chrono::{DateTime, Utc};
use evotris_training::network::{Network, NetworkLayout};
use serde::{Deserialize, Serialize};

/// A trained network as written by `train` and read by `auto-play`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    pub layout: NetworkLayout,
    pub genome: Vec<f32>,
}

impl NetworkModel {
    pub(crate) fn to_network(&self) -> anyhow::Result<Network> {
        let expected = NetworkLayout::for_agent(self.layout.hidden);
        if self.layout != expected {
            anyhow::bail!(
                "Model {} has layout {:?}, but the agent needs {} inputs and {} outputs",
                self.name,
                self.layout,
                expected.inputs,
                expected.outputs
            );
        }
        Network::from_genome(self.layout, self.genome.clone())
            .with_context(|| format!("Model {} does not match its layout", self.name))
    }
}
