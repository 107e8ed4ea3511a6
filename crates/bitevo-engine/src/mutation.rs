use rand::Rng;

use crate::{codec::Chromosome, population::Population};

/// Flips every gene of every chromosome independently with probability `probability`.
///
/// The input population is left untouched; the result has the same shape.
///
/// # Panics
///
/// Panics if `probability` is outside `[0, 1]`.
pub fn mutate<R>(population: &Population, probability: f64, rng: &mut R) -> Population
where
    R: Rng + ?Sized,
{
    let chromosomes = population
        .iter()
        .map(|c| flip_genes(c, probability, rng))
        .collect();
    Population::new(chromosomes)
}

fn flip_genes<R>(chromosome: &Chromosome, probability: f64, rng: &mut R) -> Chromosome
where
    R: Rng + ?Sized,
{
    let mut mutated = chromosome.clone();
    for gene in mutated.genes_mut() {
        if rng.random_bool(probability) {
            *gene = !*gene;
        }
    }
    mutated
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_zero_probability_is_identity() {
        let mut rng = Pcg32::seed_from_u64(40);
        let population = Population::random(60, 25, &mut rng);
        assert_eq!(mutate(&population, 0.0, &mut rng), population);
    }

    #[test]
    fn test_full_probability_complements_everything() {
        let mut rng = Pcg32::seed_from_u64(41);
        let population = Population::random(60, 25, &mut rng);
        let mutated = mutate(&population, 1.0, &mut rng);
        for (before, after) in population.iter().zip(&mutated) {
            assert_eq!(&before.complement(), after);
        }
    }

    #[test]
    fn test_flip_rate_matches_probability() {
        let mut rng = Pcg32::seed_from_u64(42);
        let population = Population::random(100, 100, &mut rng);
        let mutated = mutate(&population, 0.1, &mut rng);
        let flipped = population
            .iter()
            .zip(&mutated)
            .flat_map(|(a, b)| a.genes().iter().zip(b.genes()).filter(|(x, y)| x != y))
            .count();
        // 10_000 trials at p = 0.1
        assert!((850..=1_150).contains(&flipped), "flipped = {flipped}");
    }

    #[test]
    fn test_shape_is_preserved() {
        let mut rng = Pcg32::seed_from_u64(43);
        let population = Population::random(7, 9, &mut rng);
        let mutated = mutate(&population, 0.5, &mut rng);
        assert_eq!(mutated.len(), 7);
        assert_eq!(mutated.chromosome_length(), 9);
    }
}
