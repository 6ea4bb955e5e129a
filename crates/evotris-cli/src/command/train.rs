use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use evotris_engine::PieceSeed;
use evotris_training::{
    config::TrainingConfig,
    evaluation::SessionEvaluator,
    genetic::{Population, PopulationEvolver},
    network::NetworkLayout,
};
use rand::Rng as _;
use tracing::{debug, info};

use crate::{
    model::network_model::NetworkModel,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration (JSON); missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Override the population size
    #[arg(long)]
    population: Option<usize>,
    /// Override the number of hidden neurons
    #[arg(long)]
    hidden: Option<usize>,
    /// Name stored in the saved model
    #[arg(long, default_value = "evotris")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn load_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("training config", path)?,
            None => TrainingConfig::default(),
        };
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(hidden) = self.hidden {
            config.hidden_neurons = hidden;
        }
        config.validate().context("Invalid training config")?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.load_config()?;
    let evolver = PopulationEvolver::from_config(&config)?;
    let layout = NetworkLayout::for_agent(config.hidden_neurons);
    info!(
        population = config.population_size,
        generations = config.generations,
        genome_len = layout.genome_len(),
        "training started"
    );

    let mut rng = rand::rng();
    let mut population =
        Population::random(layout, config.population_size, &mut rng, config.max_weight);
    for generation in 0..config.generations {
        let seeds: Vec<PieceSeed> = (0..config.games_per_individual)
            .map(|_| rng.random())
            .collect();
        debug!(generation, ?seeds, "generation seeds");
        let evaluator = SessionEvaluator::new(seeds, config.tick_limit, config.reward);
        population.evaluate_fitness(&evaluator);

        if let Some(stats) = population.compute_fitness_stats() {
            info!(
                generation,
                min = stats.min,
                max = stats.max,
                mean = stats.mean,
                median = stats.median,
                std_dev = stats.std_dev,
                "generation evaluated"
            );
        }

        if generation + 1 < config.generations {
            population = evolver.evolve(&population);
        }
    }

    let best_individual = population
        .individuals()
        .first()
        .context("Population is empty")?;
    let model = NetworkModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        final_fitness: best_individual.fitness(),
        layout,
        genome: best_individual.genome().to_vec(),
    };
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!(
        "  Network: {} inputs, {} hidden, {} outputs",
        layout.inputs, layout.hidden, layout.outputs
    );

    Ok(())
}
