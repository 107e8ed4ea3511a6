//! Populations of equal-length chromosomes and their fitness evaluation.

use std::{ops::Index, slice};

use rand::Rng;
use serde::Serialize;

use crate::{
    ConfigError, FitnessError, MIN_CHROMOSOME_LENGTH, MIN_POPULATION_SIZE,
    codec::{Chromosome, Encoding},
    objective::Objective,
};

/// An ordered collection of chromosomes that all share one length.
///
/// Order carries no meaning for fitness but is kept so that crossover can pair
/// individuals by index. Every generational operator returns a new `Population`
/// instead of modifying its input.
///
/// Serialized as a sequence of bit strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
}

impl Population {
    /// Wraps `chromosomes` into a population.
    ///
    /// # Panics
    ///
    /// Panics if the chromosomes do not all have the same length.
    #[must_use]
    pub fn new(chromosomes: Vec<Chromosome>) -> Self {
        assert!(
            chromosomes
                .windows(2)
                .all(|pair| pair[0].len() == pair[1].len()),
            "all chromosomes in a population must have the same length"
        );
        Self { chromosomes }
    }

    /// Creates `size` random chromosomes of `length` genes each.
    ///
    /// No bounds are checked here; use [`create_population`] for validated input.
    pub fn random<R>(size: usize, length: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let chromosomes = (0..size)
            .map(|_| Chromosome::random(rng, length))
            .collect();
        Self { chromosomes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Length shared by every chromosome, or 0 for an empty population.
    #[must_use]
    pub fn chromosome_length(&self) -> usize {
        self.chromosomes.first().map_or(0, Chromosome::len)
    }

    #[must_use]
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Chromosome> {
        self.chromosomes.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Chromosome> {
        self.chromosomes.iter()
    }

    #[must_use]
    pub fn into_chromosomes(self) -> Vec<Chromosome> {
        self.chromosomes
    }

    /// Returns a copy of this population with the chromosome at `index` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or `chromosome` has a different length.
    #[must_use]
    pub fn with_replaced(&self, index: usize, chromosome: Chromosome) -> Self {
        let mut chromosomes = self.chromosomes.clone();
        chromosomes[index] = chromosome;
        Self::new(chromosomes)
    }

    /// Decodes every chromosome with `encoding`, in population order.
    #[must_use]
    pub fn decode(&self, encoding: &Encoding) -> Vec<f64> {
        self.iter().map(|c| encoding.decode(c)).collect()
    }

    /// Computes the fitness of every chromosome, aligned by index.
    ///
    /// Each chromosome is decoded with `encoding` and passed to `objective`. Lower is better.
    ///
    /// # Errors
    ///
    /// Fails on the first individual whose objective value is NaN or infinite.
    pub fn evaluate<O>(&self, encoding: &Encoding, objective: &O) -> Result<Vec<f64>, FitnessError>
    where
        O: Objective + ?Sized,
    {
        self.iter()
            .enumerate()
            .map(|(index, chromosome)| {
                let input = encoding.decode(chromosome);
                let value = objective.evaluate(input);
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(FitnessError {
                        index,
                        input,
                        value,
                    })
                }
            })
            .collect()
    }
}

impl Index<usize> for Population {
    type Output = Chromosome;

    fn index(&self, index: usize) -> &Self::Output {
        &self.chromosomes[index]
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Chromosome;
    type IntoIter = slice::Iter<'a, Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Creates a random initial population after checking its dimensions.
///
/// # Errors
///
/// Returns [`ConfigError`] if `size < 2` or `length < 4`.
///
/// # Example
///
/// ```
/// use bitevo_engine::create_population;
/// use rand::SeedableRng as _;
///
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
/// let population = create_population(10, 8, &mut rng).unwrap();
/// assert_eq!(population.len(), 10);
/// assert_eq!(population.chromosome_length(), 8);
///
/// assert!(create_population(10, 3, &mut rng).is_err());
/// ```
pub fn create_population<R>(
    size: usize,
    length: usize,
    rng: &mut R,
) -> Result<Population, ConfigError>
where
    R: Rng + ?Sized,
{
    if size < MIN_POPULATION_SIZE {
        return Err(ConfigError::PopulationTooSmall { size });
    }
    if length < MIN_CHROMOSOME_LENGTH {
        return Err(ConfigError::ChromosomeTooShort { length });
    }
    Ok(Population::random(size, length, rng))
}

/// Index of the lowest fitness value, first occurrence on ties.
///
/// Returns `None` for an empty slice.
///
/// ```
/// use bitevo_engine::best_index;
///
/// assert_eq!(best_index(&[3.0, 1.0, 2.0, 1.0]), Some(1));
/// assert_eq!(best_index(&[]), None);
/// ```
#[must_use]
pub fn best_index(fitness: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &f) in fitness.iter().enumerate() {
        if best.is_none_or(|(_, b)| f < b) {
            best = Some((i, f));
        }
    }
    best.map(|(i, _)| i)
}
