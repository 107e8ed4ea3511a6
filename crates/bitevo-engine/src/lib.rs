//! Bit-string genetic algorithm for minimizing a scalar function over a bounded interval.
//!
//! Candidate real numbers are encoded as fixed-length bit strings ([`Chromosome`]) and
//! evolved generation by generation until the best fitness stops changing.
//!
//! # How a Run Works
//!
//! 1. **Population** - [`create_population`] draws `n` random chromosomes of length `r`
//! 2. **Evaluation** - [`Population::evaluate`] decodes every chromosome and applies the objective
//! 3. **Record** - the generation's best (lowest fitness) is appended to the history
//! 4. **Stop test** - converged after `min_generations`, or hard cap at `max_generations`
//! 5. **Selection** - [`select`] spins a roulette wheel `n` times (lower fitness, bigger slot)
//! 6. **Crossover** - [`crossover`] exchanges a random segment within random pairs
//! 7. **Mutation** - [`mutate`] flips each gene independently
//!
//! # Encoding
//!
//! The default [`Encoding`] is a signed fixed-point number: gene 0 is the sign and the
//! remaining genes carry weights `4, 2, 1, 1/2, ...`, so values lie in `(-8, 8)`.
//!
//! ```text
//! 0 0 1 1 0 0 ...   =>   +(2 + 1) = 3.0
//! ^ ^ ^ ^
//! | | | +-- 2^0
//! | | +---- 2^1
//! | +------ 2^2
//! +-------- sign
//! ```
//!
//! # Example
//!
//! ```
//! use bitevo_engine::{EvolutionParams, RunSeed, evolve};
//!
//! let params = EvolutionParams::new(60, 25);
//! let mut rng = RunSeed::from_bytes([7; 16]).into_rng();
//! let outcome = evolve(&params, &|x: f64| (x - 3.0).powi(2), &mut rng).unwrap();
//!
//! assert_eq!(outcome.best.len(), 25);
//! assert_eq!(outcome.records.len(), outcome.populations.len());
//! ```
//!
//! # Current Limitations
//!
//! - **No global optimum guarantee**: the run stops on the first plateau of the
//!   per-generation best fitness, which may be a local optimum
//! - **No elitism by default**: the best chromosome can be lost between generations;
//!   see [`EvolutionParams::elitism`]
//! - **Sequential only**: fitness evaluation runs on the calling thread

pub use self::{
    codec::{Chromosome, Encoding, ParseChromosomeError, decode},
    crossover::{CutPoints, crossover},
    engine::{
        EngineState, Evolution, EvolutionOutcome, EvolutionParams, GenerationRecord, StopReason,
        evolve,
    },
    mutation::mutate,
    objective::Objective,
    population::{Population, best_index, create_population},
    seed::RunSeed,
    selection::{RouletteWheel, select},
};

pub mod codec;
pub mod crossover;
pub mod engine;
pub mod mutation;
pub mod objective;
pub mod population;
pub mod seed;
pub mod selection;

/// Smallest population the engine accepts.
pub const MIN_POPULATION_SIZE: usize = 2;

/// Smallest chromosome length for which crossover cut points exist.
pub const MIN_CHROMOSOME_LENGTH: usize = 4;

/// A run configuration that cannot be executed.
///
/// Returned once, before the first generation, by [`EvolutionParams::validate`] and
/// [`create_population`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("chromosome length must be at least 4, got {length}")]
    ChromosomeTooShort { length: usize },
    #[display("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[display("convergence threshold must be finite and non-negative, got {value}")]
    InvalidThreshold { value: f64 },
    #[display("weight base must be finite and positive, got {value}")]
    InvalidWeightBase { value: f64 },
    #[display("max generations ({max}) must not be below min generations ({min})")]
    InvalidGenerationBounds { min: usize, max: usize },
}

/// The objective produced a value the engine cannot rank.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("objective returned {value} for x = {input} (individual {index})")]
pub struct FitnessError {
    /// Position of the offending chromosome in its population.
    pub index: usize,
    /// Decoded value passed to the objective.
    pub input: f64,
    /// Non-finite value the objective returned.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolveError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("objective failed in generation {generation}: {source}")]
    Objective {
        generation: usize,
        source: FitnessError,
    },
}

impl From<ConfigError> for EvolveError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
