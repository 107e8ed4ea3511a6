//! Fixed-length bit strings and their fixed-point interpretation.

use std::{
    fmt::{self, Write as _},
    iter,
    str::FromStr,
};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered, fixed-length sequence of genes (bits).
///
/// Serialized as a string of `0` and `1` characters, gene 0 first.
///
/// # Example
///
/// ```
/// use bitevo_engine::Chromosome;
///
/// let c: Chromosome = "00110".parse().unwrap();
/// assert_eq!(c.len(), 5);
/// assert_eq!(c.to_string(), "00110");
/// assert_eq!(c.complement().to_string(), "11001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    genes: Vec<bool>,
}

impl Chromosome {
    #[must_use]
    pub fn from_genes(genes: Vec<bool>) -> Self {
        Self { genes }
    }

    /// Creates a chromosome of `len` unset genes.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::from_genes(vec![false; len])
    }

    /// Creates a chromosome whose genes are drawn independently and uniformly from `{0, 1}`.
    pub fn random<R>(rng: &mut R, len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_genes((0..len).map(|_| rng.random()).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    #[must_use]
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    pub(crate) fn genes_mut(&mut self) -> &mut [bool] {
        &mut self.genes
    }

    /// Returns the chromosome with every gene flipped.
    #[must_use]
    pub fn complement(&self) -> Self {
        Self::from_genes(self.genes.iter().map(|g| !g).collect())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &gene in &self.genes {
            f.write_char(if gene { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseChromosomeError {
    #[display("chromosome bit string is empty")]
    Empty,
    #[display("invalid gene {found:?} at position {position}, expected '0' or '1'")]
    InvalidGene { position: usize, found: char },
}

impl FromStr for Chromosome {
    type Err = ParseChromosomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseChromosomeError::Empty);
        }
        s.chars()
            .enumerate()
            .map(|(position, ch)| match ch {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseChromosomeError::InvalidGene { position, found }),
            })
            .collect::<Result<_, _>>()
            .map(Self::from_genes)
    }
}

impl Serialize for Chromosome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Chromosome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = String::deserialize(deserializer)?;
        bits.parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid chromosome {bits:?}: {e}")))
    }
}

/// Interpretation of a chromosome as a real number.
///
/// With a sign gene, gene 0 selects the sign and gene `i >= 1` contributes
/// `weight_base^(leading_exponent - (i - 1))`. Without one, every gene is a magnitude gene
/// and gene `i` contributes `weight_base^(leading_exponent - i)`.
///
/// [`Encoding::signed_fixed_point`] is the scheme the engine uses by default:
/// `(-1)^g0 * Σ g_i * 2^(3 - i)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    /// Number of genes per chromosome, sign gene included.
    pub length: usize,
    pub weight_base: f64,
    /// Exponent of the first magnitude gene's weight.
    pub leading_exponent: i32,
    pub sign_gene: bool,
}

impl Encoding {
    /// Signed fixed-point numbers in `(-8, 8)` with `length - 1` magnitude genes.
    #[must_use]
    pub const fn signed_fixed_point(length: usize) -> Self {
        Self {
            length,
            weight_base: 2.0,
            leading_exponent: 2,
            sign_gene: true,
        }
    }

    fn sign_genes(&self) -> usize {
        usize::from(self.sign_gene)
    }

    /// Weights of successive magnitude genes, without end.
    fn weight_sequence(&self) -> impl Iterator<Item = f64> {
        let base = self.weight_base;
        iter::successors(Some(base.powi(self.leading_exponent)), move |w| {
            Some(w / base)
        })
    }

    /// Weights of the `length - 1` (or `length`, unsigned) magnitude genes, in gene order.
    ///
    /// ```
    /// use bitevo_engine::Encoding;
    ///
    /// let weights: Vec<f64> = Encoding::signed_fixed_point(6).magnitude_weights().collect();
    /// assert_eq!(weights, vec![4.0, 2.0, 1.0, 0.5, 0.25]);
    /// ```
    pub fn magnitude_weights(&self) -> impl Iterator<Item = f64> {
        self.weight_sequence()
            .take(self.length.saturating_sub(self.sign_genes()))
    }

    /// Largest absolute value a chromosome of this encoding can decode to.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        self.magnitude_weights().sum()
    }

    /// Decodes `chromosome` to a real number.
    ///
    /// Total over every bit string: genes beyond [`Self::length`] keep extending the weight
    /// sequence, and an empty chromosome decodes to zero.
    #[must_use]
    pub fn decode(&self, chromosome: &Chromosome) -> f64 {
        let genes = chromosome.genes();
        let (negative, magnitude_genes) = if self.sign_gene {
            match genes.split_first() {
                Some((&sign, rest)) => (sign, rest),
                None => return 0.0,
            }
        } else {
            (false, genes)
        };
        let magnitude = iter::zip(magnitude_genes, self.weight_sequence())
            .filter(|(gene, _)| **gene)
            .map(|(_, weight)| weight)
            .sum::<f64>();
        if negative { -magnitude } else { magnitude }
    }
}

/// Decodes `chromosome` with [`Encoding::signed_fixed_point`] of its own length.
///
/// ```
/// use bitevo_engine::{Chromosome, decode};
///
/// let c: Chromosome = "0011000".parse().unwrap();
/// assert_eq!(decode(&c), 3.0);
/// ```
#[must_use]
pub fn decode(chromosome: &Chromosome) -> f64 {
    Encoding::signed_fixed_point(chromosome.len()).decode(chromosome)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn chromosome(bits: &str) -> Chromosome {
        bits.parse().unwrap()
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode(&chromosome("01000")), 4.0);
        assert_eq!(decode(&chromosome("11000")), -4.0);
        assert_eq!(decode(&chromosome("00110")), 3.0);
        assert_eq!(decode(&chromosome("001101")), 3.5);
        assert_eq!(decode(&chromosome("1000011")), -0.375);
    }

    #[test]
    fn test_decode_all_zero_is_zero() {
        for len in 1..30 {
            assert_eq!(decode(&Chromosome::zeros(len)), 0.0);
        }
    }

    #[test]
    fn test_decode_single_gene_is_zero_for_both_signs() {
        assert_eq!(decode(&chromosome("0")), 0.0);
        assert_eq!(decode(&chromosome("1")), 0.0);
    }

    #[test]
    fn test_flipping_sign_gene_negates() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let c = Chromosome::random(&mut rng, 25);
            let mut genes = c.genes().to_vec();
            genes[0] = !genes[0];
            let flipped = Chromosome::from_genes(genes);
            assert_eq!(decode(&flipped), -decode(&c));
        }
    }

    #[test]
    fn test_decode_is_bounded_by_max_magnitude() {
        let mut rng = Pcg32::seed_from_u64(2);
        for len in [4, 5, 10, 25] {
            let encoding = Encoding::signed_fixed_point(len);
            let bound = encoding.max_magnitude();
            for _ in 0..200 {
                let c = Chromosome::random(&mut rng, len);
                assert!(encoding.decode(&c).abs() <= bound);
            }
            let all_ones = Chromosome::zeros(len).complement();
            assert_eq!(encoding.decode(&all_ones), -bound);
        }
    }

    #[test]
    fn test_max_magnitude_approaches_eight() {
        assert_eq!(Encoding::signed_fixed_point(5).max_magnitude(), 7.5);
        let max = Encoding::signed_fixed_point(25).max_magnitude();
        assert!(max < 8.0);
        assert!(8.0 - max < 1e-5);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let c = chromosome("0101101001110");
        assert_eq!(decode(&c), decode(&c));
        assert_eq!(c, chromosome("0101101001110"));
    }

    #[test]
    fn test_unsigned_encoding_uses_every_gene() {
        let encoding = Encoding {
            length: 4,
            weight_base: 2.0,
            leading_exponent: 3,
            sign_gene: false,
        };
        assert_eq!(encoding.decode(&chromosome("1000")), 8.0);
        assert_eq!(encoding.decode(&chromosome("1111")), 15.0);
        assert_eq!(encoding.max_magnitude(), 15.0);
    }

    #[test]
    fn test_other_weight_base() {
        let encoding = Encoding {
            length: 3,
            weight_base: 10.0,
            leading_exponent: 0,
            sign_gene: true,
        };
        assert_eq!(encoding.decode(&chromosome("111")), -1.1);
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_display_roundtrip() {
            let bits = "1001110000101";
            assert_eq!(chromosome(bits).to_string(), bits);
        }

        #[test]
        fn test_error_empty_string() {
            assert_eq!("".parse::<Chromosome>(), Err(ParseChromosomeError::Empty));
        }

        #[test]
        fn test_error_invalid_character() {
            assert_eq!(
                "0102".parse::<Chromosome>(),
                Err(ParseChromosomeError::InvalidGene {
                    position: 2,
                    found: '2'
                })
            );
        }

        #[test]
        fn test_serializes_as_bit_string() {
            let c = chromosome("0110");
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, "\"0110\"");
            let back: Chromosome = serde_json::from_str(&json).unwrap();
            assert_eq!(back, c);
        }

        #[test]
        fn test_deserialize_rejects_non_bits() {
            let result: Result<Chromosome, _> = serde_json::from_str("\"01x\"");
            let err_msg = result.unwrap_err().to_string();
            assert!(err_msg.contains("invalid chromosome"));
        }
    }
}
