use bitevo_engine::{
    Chromosome, EvolutionOutcome, EvolutionParams, GenerationRecord, Population, RunSeed,
    StopReason,
};
use bitevo_objectives::Benchmark;
use bitevo_stats::{descriptive::DescriptiveStats, percentiles::Percentiles};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a single `run`, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub objective: Benchmark,
    /// Seed that replays this run with the same parameters
    pub seed: RunSeed,
    /// Timestamp when the run finished (ISO 8601 format)
    pub finished_at: DateTime<Utc>,
    pub params: EvolutionParams,
    pub stop_reason: StopReason,
    pub best: BestSolution,
    /// Best individual of every evaluated generation
    pub history: Vec<GenerationRecord>,
    /// Every evaluated population, only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populations: Option<Vec<Population>>,
}

impl RunReport {
    pub fn new(
        objective: Benchmark,
        seed: RunSeed,
        params: EvolutionParams,
        outcome: EvolutionOutcome,
        keep_populations: bool,
    ) -> Self {
        Self {
            objective,
            seed,
            finished_at: Utc::now(),
            params,
            stop_reason: outcome.stop_reason,
            best: BestSolution {
                chromosome: outcome.best,
                value: outcome.best_value,
                fitness: outcome.best_fitness,
            },
            history: outcome.records,
            populations: keep_populations.then_some(outcome.populations),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BestSolution {
    pub chromosome: Chromosome,
    pub value: f64,
    pub fitness: f64,
}

/// Aggregate of repeated seeded runs, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct TrialsReport {
    pub objective: Benchmark,
    /// Seed from which every trial seed was drawn
    pub seed: RunSeed,
    pub finished_at: DateTime<Utc>,
    pub params: EvolutionParams,
    pub tolerance: f64,
    /// Known minimizer of the objective, if it has one
    pub minimizer: Option<f64>,
    /// Fraction of trials whose best value lies within `tolerance` of `minimizer`
    pub success_rate: Option<f64>,
    /// Distance between the best value and `minimizer`
    pub error: Option<SampleSummary>,
    pub best_fitness: SampleSummary,
    pub generations: SampleSummary,
    pub trials: Vec<TrialSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub stats: DescriptiveStats,
    pub percentiles: Percentiles,
}

impl SampleSummary {
    pub const PERCENTILE_POINTS: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

    /// Returns `None` for an empty sample.
    pub fn new(values: &[f64]) -> Option<Self> {
        let stats = DescriptiveStats::new(values.iter().copied())?;
        let percentiles = Percentiles::new(values, &Self::PERCENTILE_POINTS);
        Some(Self { stats, percentiles })
    }
}

/// One trial of a `trials` batch.
#[derive(Debug, Clone, Serialize)]
pub struct TrialSummary {
    pub seed: RunSeed,
    pub stop_reason: StopReason,
    pub generations: usize,
    pub best_value: f64,
    pub best_fitness: f64,
}

impl TrialSummary {
    pub fn new(seed: RunSeed, outcome: &EvolutionOutcome) -> Self {
        Self {
            seed,
            stop_reason: outcome.stop_reason,
            generations: outcome.generations(),
            best_value: outcome.best_value,
            best_fitness: outcome.best_fitness,
        }
    }
}

#[cfg(test)]
mod tests {
    use bitevo_engine::evolve;

    use super::*;

    #[test]
    fn test_sample_summary_of_empty_sample() {
        assert!(SampleSummary::new(&[]).is_none());
        let summary = SampleSummary::new(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.stats.count, 4);
        assert_eq!(summary.percentiles.get(50.0), Some(3.0));
    }

    #[test]
    fn test_run_report_json_shape() {
        let seed = RunSeed::from_bytes([9; 16]);
        let params = EvolutionParams::new(8, 10);
        let outcome = evolve(&params, &Benchmark::Quadratic, &mut seed.into_rng()).unwrap();
        let generations = outcome.generations();

        let report = RunReport::new(Benchmark::Quadratic, seed, params.clone(), outcome, false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["objective"], "quadratic");
        assert_eq!(json["seed"], "09090909090909090909090909090909");
        assert_eq!(json["history"].as_array().unwrap().len(), generations);
        assert_eq!(json["best"]["chromosome"].as_str().unwrap().len(), 10);
        assert!(json.get("populations").is_none());

        let outcome = evolve(&params, &Benchmark::Quadratic, &mut seed.into_rng()).unwrap();
        let report = RunReport::new(Benchmark::Quadratic, seed, params, outcome, true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["populations"].as_array().unwrap().len(), generations);
    }
}
