//! Fitness-proportional (roulette-wheel) selection for minimization.
//!
//! Each candidate gets the weight `(max(fitness) - fitness_i) + 1`, so the lowest fitness
//! owns the largest slot and even the worst candidate keeps a slot of width 1. Slots are
//! laid out in descending weight order (stable on ties) and a spin resolves to the first
//! slot whose cumulative weight reaches the drawn point.

use log::warn;
use rand::Rng;

use crate::population::Population;

/// Cumulative-weight table built from one generation's fitness values.
///
/// # Example
///
/// ```
/// use bitevo_engine::RouletteWheel;
///
/// let wheel = RouletteWheel::new(&[1.0, 2.0, 3.0]);
/// assert_eq!(wheel.slots(), &[0, 1, 2]);
/// assert_eq!(wheel.cumulative_weights(), &[3.0, 5.0, 6.0]);
/// assert_eq!(wheel.total(), 6.0);
/// ```
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    /// Candidate index owning each slot, in wheel order.
    slots: Vec<usize>,
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the wheel for `fitness` (lower is better).
    ///
    /// # Panics
    ///
    /// Panics if `fitness` is empty.
    #[must_use]
    pub fn new(fitness: &[f64]) -> Self {
        assert!(!fitness.is_empty(), "cannot build a roulette wheel without candidates");

        let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut weighted = fitness
            .iter()
            // the gap first, so a large `max` cannot absorb the `+ 1`
            .map(|f| (max - f) + 1.0)
            .enumerate()
            .collect::<Vec<_>>();
        // `sort_by` is stable, so equal weights keep candidate order
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut total = 0.0;
        let (slots, mut cumulative): (Vec<usize>, Vec<f64>) = weighted
            .into_iter()
            .map(|(index, weight)| {
                total += weight;
                (index, total)
            })
            .unzip();

        if !total.is_finite() {
            warn!("roulette wheel total weight overflowed ({total}), using uniform slots");
            let mut acc = 0.0;
            for c in &mut cumulative {
                acc += 1.0;
                *c = acc;
            }
        }

        Self { slots, cumulative }
    }

    /// Candidate indices in wheel order.
    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Running sum of slot weights, in wheel order. Non-decreasing.
    #[must_use]
    pub fn cumulative_weights(&self) -> &[f64] {
        &self.cumulative
    }

    /// Sum of all slot weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Draws a point uniformly in `[0, total]` and returns the candidate index it lands on.
    pub fn spin<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let point = rng.random_range(0.0..=self.total());
        let slot = self
            .cumulative
            .partition_point(|&c| c < point)
            .min(self.cumulative.len() - 1);
        self.slots[slot]
    }
}

/// Samples `count` chromosomes from `population` with replacement, by roulette wheel.
///
/// The input is left untouched; the result holds copies.
///
/// # Panics
///
/// Panics if `fitness` and `population` differ in length or are empty.
pub fn select<R>(fitness: &[f64], population: &Population, count: usize, rng: &mut R) -> Population
where
    R: Rng + ?Sized,
{
    assert_eq!(
        fitness.len(),
        population.len(),
        "fitness must be aligned with the population"
    );
    let wheel = RouletteWheel::new(fitness);
    let chromosomes = (0..count)
        .map(|_| population[wheel.spin(rng)].clone())
        .collect();
    Population::new(chromosomes)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::codec::Chromosome;

    fn numbered_population(size: usize) -> Population {
        // chromosome i encodes i in its trailing bits so copies can be traced back
        Population::new(
            (0..size)
                .map(|i| {
                    let genes = (0..8).rev().map(|bit| (i >> bit) & 1 == 1).collect();
                    Chromosome::from_genes(genes)
                })
                .collect(),
        )
    }

    fn origin(population: &Population, chromosome: &Chromosome) -> usize {
        population.iter().position(|c| c == chromosome).unwrap()
    }

    #[test]
    fn test_cumulative_weights_are_non_decreasing_and_sum_weights() {
        let fitness = [4.0, -2.5, 10.0, 0.0, 3.25, 10.0];
        let wheel = RouletteWheel::new(&fitness);
        let weights_sum: f64 = fitness.iter().map(|f| 10.0 + 1.0 - f).sum();

        assert!(wheel.cumulative_weights().is_sorted());
        assert!((wheel.total() - weights_sum).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let wheel = RouletteWheel::new(&[5.0, 1.0, 5.0, 1.0]);
        assert_eq!(wheel.slots(), &[1, 3, 0, 2]);
        assert_eq!(wheel.cumulative_weights(), &[5.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_equal_fitness_gives_unit_weights() {
        let wheel = RouletteWheel::new(&[7.0; 5]);
        assert_eq!(wheel.slots(), &[0, 1, 2, 3, 4]);
        assert_eq!(wheel.cumulative_weights(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_overflowing_weights_fall_back_to_uniform() {
        let wheel = RouletteWheel::new(&[f64::MAX, -f64::MAX]);
        assert_eq!(wheel.total(), 2.0);
    }

    #[test]
    fn test_large_equal_fitness_keeps_unit_weights() {
        let wheel = RouletteWheel::new(&[1e17; 4]);
        assert_eq!(wheel.cumulative_weights(), &[1.0, 2.0, 3.0, 4.0]);

        let mut rng = Pcg32::seed_from_u64(25);
        let mut counts = [0_usize; 4];
        for _ in 0..4_000 {
            counts[wheel.spin(&mut rng)] += 1;
        }
        // 1_000 expected per candidate
        for count in counts {
            assert!((880..=1_120).contains(&count), "counts = {counts:?}");
        }
    }

    #[test]
    fn test_worst_of_large_fitness_still_gets_a_slot() {
        let wheel = RouletteWheel::new(&[1e18, 1e18 - 4_096.0]);
        assert_eq!(wheel.slots(), &[1, 0]);
        assert_eq!(wheel.cumulative_weights(), &[4_097.0, 4_098.0]);
    }

    #[test]
    fn test_spin_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(20);
        let wheel = RouletteWheel::new(&[0.5, 3.0, 1.0, 9.0, 2.0]);
        for _ in 0..1_000 {
            assert!(wheel.spin(&mut rng) < 5);
        }
    }

    #[test]
    fn test_lower_fitness_is_selected_more_often() {
        let mut rng = Pcg32::seed_from_u64(21);
        // weights 10 and 1
        let wheel = RouletteWheel::new(&[0.0, 9.0]);
        let hits = (0..10_000).filter(|_| wheel.spin(&mut rng) == 0).count();
        assert!((8_800..=9_400).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_select_returns_copies_of_inputs() {
        let mut rng = Pcg32::seed_from_u64(22);
        let population = numbered_population(6);
        let before = population.clone();
        let fitness = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0];

        let selected = select(&fitness, &population, 6, &mut rng);

        assert_eq!(selected.len(), 6);
        assert!(selected.iter().all(|c| population.iter().any(|p| p == c)));
        assert_eq!(population, before);
    }

    #[test]
    fn test_select_with_equal_fitness_is_uniform() {
        let mut rng = Pcg32::seed_from_u64(23);
        let population = numbered_population(5);
        let fitness = [2.0; 5];
        let mut counts = [0_usize; 5];
        for _ in 0..400 {
            for c in &select(&fitness, &population, 5, &mut rng) {
                counts[origin(&population, c)] += 1;
            }
        }
        // 2_000 draws, 400 expected per candidate
        for count in counts {
            assert!((320..=480).contains(&count), "counts = {counts:?}");
        }
    }

    #[test]
    #[should_panic(expected = "aligned")]
    fn test_select_rejects_misaligned_fitness() {
        let mut rng = Pcg32::seed_from_u64(24);
        let _ = select(&[1.0], &numbered_population(2), 2, &mut rng);
    }
}
