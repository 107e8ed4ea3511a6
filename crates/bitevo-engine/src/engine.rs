//! Generational control loop and stopping policy.
//!
//! One generation is one transition of [`Evolution::step`]:
//!
//! 1. Record the current population
//! 2. Evaluate its fitness
//! 3. Record the generation's best (first minimum) as a [`GenerationRecord`]
//! 4. Stop test, in order:
//!    - `generation > min_generations` and `|best - previous_best| <= convergence_threshold`
//!      stops with [`StopReason::Converged`]
//!    - `generation > max_generations` stops with [`StopReason::GenerationLimit`]
//! 5. Otherwise build the next population as `mutate(crossover(select(..)))` and advance
//!
//! The reported best is the best of the final generation, not a running optimum across
//! generations. Without [`EvolutionParams::elitism`] the best chromosome may be lost
//! between generations, so the best fitness is not monotone.

use std::fmt;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, EvolveError, MIN_CHROMOSOME_LENGTH, MIN_POPULATION_SIZE,
    codec::{Chromosome, Encoding},
    crossover::crossover,
    mutation::mutate,
    objective::Objective,
    population::{Population, best_index, create_population},
    selection::select,
};

/// Parameters of one evolution run.
///
/// Deserializable with every field optional; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Number of chromosomes per generation (`n`, default 60).
    pub population_size: usize,
    /// Chromosome layout (default signed fixed point with 25 genes).
    pub encoding: Encoding,
    /// Largest change of the best fitness between two generations that counts as converged
    /// (`e`, default 0.001).
    pub convergence_threshold: f64,
    /// Probability that a pair exchanges a segment (`cp`, default 0.5).
    pub crossover_probability: f64,
    /// Per-gene flip probability (`mp`, default 0.01).
    pub mutation_probability: f64,
    /// Generations that must pass before the convergence test applies (default 50).
    pub min_generations: usize,
    /// Generation index past which the run stops regardless (default 500).
    pub max_generations: usize,
    /// Copy each generation's best chromosome into slot 0 of the next (default off).
    pub elitism: bool,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 60,
            encoding: Encoding::signed_fixed_point(25),
            convergence_threshold: 0.001,
            crossover_probability: 0.5,
            mutation_probability: 0.01,
            min_generations: 50,
            max_generations: 500,
            elitism: false,
        }
    }
}

impl EvolutionParams {
    /// Default parameters for `population_size` chromosomes of `chromosome_length` genes.
    #[must_use]
    pub fn new(population_size: usize, chromosome_length: usize) -> Self {
        Self {
            population_size,
            encoding: Encoding::signed_fixed_point(chromosome_length),
            ..Self::default()
        }
    }

    /// Checks every parameter before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.encoding.length < MIN_CHROMOSOME_LENGTH {
            return Err(ConfigError::ChromosomeTooShort {
                length: self.encoding.length,
            });
        }
        let base = self.encoding.weight_base;
        if !(base.is_finite() && base > 0.0) {
            return Err(ConfigError::InvalidWeightBase { value: base });
        }
        let threshold = self.convergence_threshold;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold { value: threshold });
        }
        for (name, value) in [
            ("crossover probability", self.crossover_probability),
            ("mutation probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        if self.max_generations < self.min_generations {
            return Err(ConfigError::InvalidGenerationBounds {
                min: self.min_generations,
                max: self.max_generations,
            });
        }
        Ok(())
    }
}

/// Best individual of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    /// Decoded value of the generation's best chromosome.
    pub value: f64,
    pub fitness: f64,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    #[display("converged")]
    Converged,
    #[display("generation limit reached")]
    GenerationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    Running,
    /// Terminal; `best_index` points into the final population.
    Stopped {
        reason: StopReason,
        best_index: usize,
    },
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Best chromosome of the final generation.
    pub best: Chromosome,
    pub best_value: f64,
    pub best_fitness: f64,
    pub stop_reason: StopReason,
    /// One record per evaluated generation, in order.
    pub records: Vec<GenerationRecord>,
    /// Every evaluated population, in order; aligned with `records`.
    pub populations: Vec<Population>,
}

impl EvolutionOutcome {
    /// Number of evaluated generations.
    #[must_use]
    pub fn generations(&self) -> usize {
        self.records.len()
    }
}

/// A run in progress.
///
/// Created in [`EngineState::Running`] with a fresh random population; each
/// [`step`](Self::step) performs one generation until the state becomes
/// [`EngineState::Stopped`].
pub struct Evolution<'a, O: ?Sized> {
    params: EvolutionParams,
    objective: &'a O,
    population: Population,
    generation: usize,
    previous_best: Option<f64>,
    records: Vec<GenerationRecord>,
    populations: Vec<Population>,
    state: EngineState,
}

impl<O: ?Sized> fmt::Debug for Evolution<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evolution")
            .field("params", &self.params)
            .field("generation", &self.generation)
            .field("previous_best", &self.previous_best)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, O> Evolution<'a, O>
where
    O: Objective + ?Sized,
{
    /// Validates `params` and draws the initial population.
    pub fn new<R>(
        params: EvolutionParams,
        objective: &'a O,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        params.validate()?;
        let population = create_population(params.population_size, params.encoding.length, rng)?;
        Ok(Self {
            params,
            objective,
            population,
            generation: 0,
            previous_best: None,
            records: vec![],
            populations: vec![],
            state: EngineState::Running,
        })
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Index of the generation the next step evaluates (or the final one, once stopped).
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Populations evaluated so far, aligned with [`Self::records`].
    #[must_use]
    pub fn history(&self) -> &[Population] {
        &self.populations
    }

    /// Performs one generation. Does nothing once stopped.
    ///
    /// # Errors
    ///
    /// Returns [`EvolveError::Objective`] if the objective yields a non-finite value; the
    /// run cannot continue after that.
    pub fn step<R>(&mut self, rng: &mut R) -> Result<EngineState, EvolveError>
    where
        R: Rng + ?Sized,
    {
        if self.state.is_stopped() {
            return Ok(self.state);
        }

        self.populations.push(self.population.clone());
        let fitness = self
            .population
            .evaluate(&self.params.encoding, self.objective)
            .map_err(|source| EvolveError::Objective {
                generation: self.generation,
                source,
            })?;

        let best = best_index(&fitness).expect("population is never empty");
        let record = GenerationRecord {
            generation: self.generation,
            value: self.params.encoding.decode(&self.population[best]),
            fitness: fitness[best],
        };
        self.records.push(record);
        debug!(
            "generation {}: best x = {:.6}, fitness = {:.6}",
            record.generation, record.value, record.fitness
        );

        if let Some(reason) = self.stop_reason(record.fitness) {
            info!(
                "evolution stopped after {} generations: {reason}",
                self.records.len()
            );
            self.state = EngineState::Stopped {
                reason,
                best_index: best,
            };
            return Ok(self.state);
        }

        self.previous_best = Some(record.fitness);
        let params = &self.params;
        let selected = select(&fitness, &self.population, params.population_size, rng);
        let crossed = crossover(&selected, params.crossover_probability, rng);
        let mut next = mutate(&crossed, params.mutation_probability, rng);
        if params.elitism {
            next = next.with_replaced(0, self.population[best].clone());
        }
        self.population = next;
        self.generation += 1;
        Ok(self.state)
    }

    fn stop_reason(&self, best_fitness: f64) -> Option<StopReason> {
        let params = &self.params;
        let converged = self.generation > params.min_generations
            && self
                .previous_best
                .is_some_and(|prev| (best_fitness - prev).abs() <= params.convergence_threshold);
        if converged {
            Some(StopReason::Converged)
        } else if self.generation > params.max_generations {
            Some(StopReason::GenerationLimit)
        } else {
            None
        }
    }

    /// Steps until the run stops and returns its outcome.
    pub fn run<R>(mut self, rng: &mut R) -> Result<EvolutionOutcome, EvolveError>
    where
        R: Rng + ?Sized,
    {
        while self.state.is_running() {
            self.step(rng)?;
        }
        Ok(self
            .into_outcome()
            .expect("run loop only exits once stopped"))
    }

    /// Consumes a stopped run; returns `None` while still running.
    #[must_use]
    pub fn into_outcome(self) -> Option<EvolutionOutcome> {
        let EngineState::Stopped { reason, best_index } = self.state else {
            return None;
        };
        let last = *self.records.last()?;
        Some(EvolutionOutcome {
            best: self.population[best_index].clone(),
            best_value: last.value,
            best_fitness: last.fitness,
            stop_reason: reason,
            records: self.records,
            populations: self.populations,
        })
    }
}

/// Runs the genetic algorithm to completion.
///
/// # Errors
///
/// [`EvolveError::Config`] before the first generation if `params` is invalid;
/// [`EvolveError::Objective`] with the failing generation if the objective misbehaves.
///
/// # Example
///
/// ```
/// use bitevo_engine::{EvolutionParams, evolve};
/// use rand::SeedableRng as _;
///
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(5);
/// let params = EvolutionParams { population_size: 1, ..EvolutionParams::default() };
/// assert!(evolve(&params, &|x: f64| x * x, &mut rng).is_err());
/// ```
pub fn evolve<O, R>(
    params: &EvolutionParams,
    objective: &O,
    rng: &mut R,
) -> Result<EvolutionOutcome, EvolveError>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    Evolution::new(params.clone(), objective, rng)?.run(rng)
}
