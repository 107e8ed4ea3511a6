use std::path::PathBuf;

use bitevo_engine::{RunSeed, evolve};
use bitevo_objectives::Benchmark;
use chrono::Utc;
use rand::Rng as _;

use crate::{
    command::EvolutionArg,
    schema::report::{SampleSummary, TrialSummary, TrialsReport},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrialsArg {
    #[arg(long, default_value = "quadratic")]
    objective: Benchmark,
    /// Number of independent runs
    #[arg(long, default_value_t = 20)]
    count: usize,
    /// Largest distance to the known minimizer that counts as a success
    #[arg(long, default_value_t = 0.5)]
    tolerance: f64,
    /// 32-digit hex seed from which every trial seed is drawn
    #[arg(long)]
    seed: Option<RunSeed>,
    #[clap(flatten)]
    pub(super) evolution: EvolutionArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrialsArg) -> anyhow::Result<()> {
    let TrialsArg {
        objective,
        count,
        tolerance,
        seed,
        evolution,
        output,
    } = arg;
    anyhow::ensure!(*count > 0, "trial count must be positive");
    anyhow::ensure!(
        tolerance.is_finite() && *tolerance >= 0.0,
        "tolerance must be a non-negative number, got {tolerance}"
    );
    let params = evolution.to_params()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut seeds = seed.into_rng();

    eprintln!(
        "Running {count} trials on {} (seed {seed})",
        objective.name()
    );
    let mut trials = Vec::with_capacity(*count);
    for i in 0..*count {
        let trial_seed: RunSeed = seeds.random();
        let outcome = evolve(&params, objective, &mut trial_seed.into_rng())?;
        eprintln!(
            "  {i:3}: {} after {:3} generations: x = {:.6} => {:.6}",
            outcome.stop_reason,
            outcome.generations(),
            outcome.best_value,
            outcome.best_fitness
        );
        trials.push(TrialSummary::new(trial_seed, &outcome));
    }

    let minimizer = objective.known_minimizer();
    let errors = minimizer.map(|m| {
        trials
            .iter()
            .map(|t| (t.best_value - m).abs())
            .collect::<Vec<_>>()
    });
    #[expect(clippy::cast_precision_loss)]
    let success_rate = errors.as_ref().map(|errors| {
        errors.iter().filter(|e| **e <= *tolerance).count() as f64 / errors.len() as f64
    });
    #[expect(clippy::cast_precision_loss)]
    let generations = trials
        .iter()
        .map(|t| t.generations as f64)
        .collect::<Vec<_>>();
    let best_fitness = trials.iter().map(|t| t.best_fitness).collect::<Vec<_>>();

    let report = TrialsReport {
        objective: *objective,
        seed,
        finished_at: Utc::now(),
        params,
        tolerance: *tolerance,
        minimizer,
        success_rate,
        error: errors.as_deref().and_then(SampleSummary::new),
        best_fitness: SampleSummary::new(&best_fitness).expect("at least one trial"),
        generations: SampleSummary::new(&generations).expect("at least one trial"),
        trials,
    };

    eprintln!();
    eprintln!("Trials finished");
    if let (Some(rate), Some(minimizer)) = (report.success_rate, minimizer) {
        eprintln!(
            "  Success rate: {:.1}% within {tolerance} of {minimizer}",
            rate * 100.0
        );
    }
    if let Some(error) = &report.error {
        eprintln!(
            "  Error: median {:.6}, mean {:.6}, max {:.6}",
            error.stats.median, error.stats.mean, error.stats.max
        );
    }
    let stats = &report.generations.stats;
    eprintln!(
        "  Generations: min {}, median {}, max {}",
        stats.min, stats.median, stats.max
    );

    util::save_json(&report, output.as_deref())
}
