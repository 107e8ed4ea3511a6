use std::path::PathBuf;

use anyhow::Context as _;
use bitevo_engine::{Evolution, RunSeed};
use bitevo_objectives::Benchmark;
use bitevo_stats::descriptive::DescriptiveStats;
use rand::Rng as _;

use crate::{command::EvolutionArg, schema::report::RunReport, util};

/// Generations between two progress reports.
const PROGRESS_INTERVAL: usize = 50;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    #[arg(long, default_value = "quadratic")]
    objective: Benchmark,
    /// 32-digit hex seed; a random one is drawn when omitted
    #[arg(long)]
    seed: Option<RunSeed>,
    #[clap(flatten)]
    evolution: EvolutionArg,
    /// Include every evaluated population in the report
    #[arg(long)]
    populations: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        objective,
        seed,
        evolution,
        populations,
        output,
    } = arg;
    let params = evolution.to_params()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.into_rng();

    eprintln!("Minimizing {} (seed {seed})", objective.name());
    let mut evolution = Evolution::new(params.clone(), objective, &mut rng)?;
    loop {
        let state = evolution.step(&mut rng)?;
        let Some(record) = evolution.records().last() else {
            break;
        };
        if record.generation % PROGRESS_INTERVAL == 0 || state.is_stopped() {
            let population = evolution
                .history()
                .last()
                .context("evaluated generation has no population")?;
            let fitness = population.evaluate(&params.encoding, objective)?;
            eprintln!("Generation #{}:", record.generation);
            eprintln!("  Best: x = {:.6} => {:.6}", record.value, record.fitness);
            if let Some(stats) = DescriptiveStats::new(fitness) {
                eprintln!("  Fitness Stats:");
                eprintln!("    Min:    {:.6}", stats.min);
                eprintln!("    Median: {:.6}", stats.median);
                eprintln!("    Mean:   {:.6}", stats.mean);
                eprintln!("    Max:    {:.6}", stats.max);
                eprintln!("    StdDev: {:.6}", stats.std_dev);
            }
        }
        if state.is_stopped() {
            break;
        }
    }
    let outcome = evolution
        .into_outcome()
        .context("evolution stopped without an outcome")?;

    eprintln!();
    eprintln!("Evolution finished: {}", outcome.stop_reason);
    eprintln!("  Generations: {}", outcome.generations());
    eprintln!("  Best chromosome: {}", outcome.best);
    eprintln!("  Best value: {:.6}", outcome.best_value);
    eprintln!("  Best fitness: {:.6}", outcome.best_fitness);
    if let Some(minimizer) = objective.known_minimizer() {
        eprintln!(
            "  Distance to minimizer {minimizer}: {:.6}",
            (outcome.best_value - minimizer).abs()
        );
    }

    let report = RunReport::new(*objective, seed, params, outcome, *populations);
    util::save_json(&report, output.as_deref())?;
    if let Some(path) = output {
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}
