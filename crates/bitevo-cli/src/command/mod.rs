use std::path::PathBuf;

use anyhow::Context as _;
use bitevo_engine::EvolutionParams;
use clap::{Parser, Subcommand};

use crate::util;

use self::{decode::DecodeArg, run::RunArg, trials::TrialsArg};

mod decode;
mod run;
mod trials;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Minimize a benchmark objective with the genetic algorithm
    Run(#[clap(flatten)] RunArg),
    /// Repeat seeded runs and report how often they reach the known minimizer
    Trials(#[clap(flatten)] TrialsArg),
    /// Decode bit strings with the default signed fixed-point encoding
    Decode(#[clap(flatten)] DecodeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Trials(arg) => trials::run(&arg)?,
        Mode::Decode(arg) => decode::run(&arg),
    }
    Ok(())
}

/// Evolution parameters shared by `run` and `trials`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvolutionArg {
    /// JSON file with evolution parameters; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chromosomes per generation
    #[arg(long, short = 'n')]
    population: Option<usize>,
    /// Genes per chromosome, sign gene included
    #[arg(long, short = 'r')]
    length: Option<usize>,
    /// Largest change of the best fitness between generations that counts as converged
    #[arg(long, short = 'e')]
    threshold: Option<f64>,
    /// Probability that a pair of chromosomes exchanges a segment
    #[arg(long)]
    crossover: Option<f64>,
    /// Per-gene flip probability
    #[arg(long)]
    mutation: Option<f64>,
    /// Generations that must pass before the convergence test applies
    #[arg(long)]
    min_generations: Option<usize>,
    /// Generation index past which the run stops regardless of convergence
    #[arg(long)]
    max_generations: Option<usize>,
    /// Carry each generation's best chromosome into the next generation
    #[arg(long)]
    elitism: bool,
}

impl EvolutionArg {
    pub(crate) fn to_params(&self) -> anyhow::Result<EvolutionParams> {
        let mut params = match &self.config {
            Some(path) => {
                let params: EvolutionParams = util::read_json_file("evolution parameters", path)?;
                log::info!("loaded evolution parameters from {}", path.display());
                params
            }
            None => EvolutionParams::default(),
        };
        if let Some(size) = self.population {
            params.population_size = size;
        }
        if let Some(length) = self.length {
            params.encoding.length = length;
        }
        if let Some(threshold) = self.threshold {
            params.convergence_threshold = threshold;
        }
        if let Some(probability) = self.crossover {
            params.crossover_probability = probability;
        }
        if let Some(probability) = self.mutation {
            params.mutation_probability = probability;
        }
        if let Some(min) = self.min_generations {
            params.min_generations = min;
        }
        if let Some(max) = self.max_generations {
            params.max_generations = max;
        }
        if self.elitism {
            params.elitism = true;
        }
        params
            .validate()
            .context("Invalid evolution parameters")?;
        Ok(params)
    }
}
