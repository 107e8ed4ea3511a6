use std::fmt;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a reproducible evolution run.
///
/// A 128-bit seed for the [`Pcg32`] generator that drives population creation,
/// selection, crossover and mutation. The same seed with the same parameters and
/// objective replays the same run.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use bitevo_engine::RunSeed;
/// use rand::Rng as _;
///
/// let seed: RunSeed = rand::rng().random();
/// let a: u64 = seed.into_rng().random();
/// let b: u64 = seed.into_rng().random();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSeed([u8; 16]);

impl RunSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn into_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for RunSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: {reason}")]
pub struct ParseSeedError {
    input: String,
    reason: String,
}

impl std::str::FromStr for RunSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                input: s.to_owned(),
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            input: s.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for RunSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RunSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `RunSeed` values with `rng.random()`.
impl Distribution<RunSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RunSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        RunSeed(seed)
    }
}
