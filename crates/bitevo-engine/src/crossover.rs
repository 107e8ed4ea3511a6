//! Two-point segment exchange between randomly paired chromosomes.

use std::ops::Range;

use rand::{Rng, seq::index};

use crate::{MIN_CHROMOSOME_LENGTH, codec::Chromosome, population::Population};

/// Half-open gene range `[start, end)` exchanged by one crossover.
///
/// `start` lies in `[2, r - 2]` and `end` in `[start, r]`, so the sign gene and the
/// first magnitude gene never move and the segment may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutPoints {
    pub start: usize,
    pub end: usize,
}

impl CutPoints {
    /// Draws cut points for chromosomes of `length` genes.
    ///
    /// # Panics
    ///
    /// Panics if `length < 4`, where no valid `start` exists.
    pub fn sample<R>(length: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(
            length >= MIN_CHROMOSOME_LENGTH,
            "crossover needs chromosomes of at least {MIN_CHROMOSOME_LENGTH} genes, got {length}"
        );
        let start = rng.random_range(2..=length - 2);
        let end = rng.random_range(start..=length);
        Self { start, end }
    }

    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Swaps genes `range` between the chromosomes at `i` and `j` (`i != j`).
fn exchange_segment(chromosomes: &mut [Chromosome], i: usize, j: usize, range: Range<usize>) {
    let (lo, hi) = (usize::min(i, j), usize::max(i, j));
    let (head, tail) = chromosomes.split_at_mut(hi);
    head[lo].genes_mut()[range.clone()].swap_with_slice(&mut tail[0].genes_mut()[range]);
}

/// Recombines `population` pairwise and returns the result.
///
/// `⌊n/2⌋` disjoint pairs are drawn without replacement; with an odd `n` one individual
/// stays unpaired and is copied unchanged. Each pair exchanges a [`CutPoints`] segment
/// with probability `probability`, otherwise it is copied unchanged.
///
/// # Panics
///
/// Panics if `probability` is outside `[0, 1]`, or if a swap is attempted on chromosomes
/// shorter than 4 genes.
///
/// # Example
///
/// ```
/// use bitevo_engine::{Population, crossover};
/// use rand::SeedableRng as _;
///
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
/// let population = Population::random(7, 12, &mut rng);
///
/// // without crossover the population passes through untouched
/// assert_eq!(crossover(&population, 0.0, &mut rng), population);
/// assert_eq!(crossover(&population, 1.0, &mut rng).len(), 7);
/// ```
pub fn crossover<R>(population: &Population, probability: f64, rng: &mut R) -> Population
where
    R: Rng + ?Sized,
{
    let length = population.chromosome_length();
    let mut offspring = population.clone().into_chromosomes();
    let mut pool = (0..offspring.len()).collect::<Vec<_>>();

    for _ in 0..offspring.len() / 2 {
        let picked = index::sample(rng, pool.len(), 2);
        let (a, b) = (picked.index(0), picked.index(1));
        let (c1, c2) = (pool[a], pool[b]);
        // remove the higher position first so the lower one stays valid
        pool.swap_remove(usize::max(a, b));
        pool.swap_remove(usize::min(a, b));

        if rng.random_bool(probability) {
            let cut = CutPoints::sample(length, rng);
            exchange_segment(&mut offspring, c1, c2, cut.range());
        }
    }

    Population::new(offspring)
}
