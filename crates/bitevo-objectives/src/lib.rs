//! Benchmark objectives for the bit-string genetic algorithm.
//!
//! Every benchmark is a scalar function of one real variable on the engine's default
//! domain `(-8, 8)`. Lower values are better.
//!
//! | Benchmark     | Formula                       | Minimizer |
//! |---------------|-------------------------------|-----------|
//! | `quadratic`   | `(x - 3)²`                    | `3`       |
//! | `rastrigin`   | `10 + x² - 10·cos(2πx)`       | `0`       |
//! | `parabola`    | `-20 + (x + 2)²`              | `-2`      |
//! | `oscillating` | `e^(-x/4) + sin(8x)`          | unknown   |
//! | `plateau`     | `e^(|x|^(1/99))`              | `0`       |
//!
//! `rastrigin` and `oscillating` have many local minima and are the interesting cases
//! for premature convergence. `plateau` is almost flat away from zero, so the
//! convergence test tends to fire early.
//!
//! # Example
//!
//! ```
//! use bitevo_engine::{EvolutionParams, RunSeed, evolve};
//! use bitevo_objectives::Benchmark;
//!
//! let benchmark: Benchmark = "parabola".parse().unwrap();
//! let mut rng = RunSeed::from_bytes([1; 16]).into_rng();
//! let outcome = evolve(&EvolutionParams::default(), &benchmark, &mut rng).unwrap();
//! assert!(outcome.best_fitness >= -20.0);
//! ```

use std::f64::consts::PI;

use bitevo_engine::Objective;
use serde::{Deserialize, Serialize};

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Benchmark {
    #[default]
    Quadratic,
    Rastrigin,
    Parabola,
    Oscillating,
    Plateau,
}

impl Benchmark {
    pub const ALL: [Self; 5] = [
        Self::Quadratic,
        Self::Rastrigin,
        Self::Parabola,
        Self::Oscillating,
        Self::Plateau,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quadratic => "quadratic",
            Self::Rastrigin => "rastrigin",
            Self::Parabola => "parabola",
            Self::Oscillating => "oscillating",
            Self::Plateau => "plateau",
        }
    }

    #[must_use]
    pub fn value(self, x: f64) -> f64 {
        match self {
            Self::Quadratic => (x - 3.0).powi(2),
            Self::Rastrigin => 10.0 + x.powi(2) - 10.0 * (2.0 * PI * x).cos(),
            Self::Parabola => -20.0 + (x + 2.0).powi(2),
            Self::Oscillating => (-x / 4.0).exp() + (8.0 * x).sin(),
            Self::Plateau => x.abs().powf(1.0 / 99.0).exp(),
        }
    }

    /// Argument of the global minimum on `(-8, 8)`, when it has a closed form.
    #[must_use]
    pub const fn known_minimizer(self) -> Option<f64> {
        match self {
            Self::Quadratic => Some(3.0),
            Self::Rastrigin | Self::Plateau => Some(0.0),
            Self::Parabola => Some(-2.0),
            Self::Oscillating => None,
        }
    }
}

impl Objective for Benchmark {
    fn evaluate(&self, x: f64) -> f64 {
        self.value(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name() {
        for benchmark in Benchmark::ALL {
            assert_eq!(benchmark.name().parse::<Benchmark>().unwrap(), benchmark);
        }
        assert!("sphere".parse::<Benchmark>().is_err());
    }

    #[test]
    fn test_known_minimizers_are_local_minima() {
        for benchmark in Benchmark::ALL {
            let Some(x) = benchmark.known_minimizer() else {
                continue;
            };
            let at = benchmark.value(x);
            for dx in [-0.01, 0.01, -0.5, 0.5] {
                assert!(benchmark.value(x + dx) > at, "{benchmark:?} at {x} + {dx}");
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Benchmark::Quadratic.value(3.0), 0.0);
        assert_eq!(Benchmark::Rastrigin.value(0.0), 0.0);
        assert_eq!(Benchmark::Parabola.value(-2.0), -20.0);
        assert_eq!(Benchmark::Plateau.value(0.0), 1.0);
        assert_eq!(Benchmark::Oscillating.value(0.0), 1.0);
    }

    #[test]
    fn test_values_are_finite_on_domain() {
        for benchmark in Benchmark::ALL {
            for i in -80..80 {
                let x = f64::from(i) / 10.0;
                assert!(benchmark.evaluate(x).is_finite(), "{benchmark:?} at {x}");
            }
        }
    }
}
