//! Geometric level generator.

use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;
use crate::{MAX_LEVEL, PROMOTION_PROBABILITY};

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The maximum number of levels must be less than `i32::MAX`.
    #[error("max must be less than i32::MAX.")]
    MaxTooLarge,
    /// The probability `p` must be in the range `(0, 1)`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
    /// Failed to initialize the random number generator.
    #[error("Failed to initialize the random number generator.")]
    RngInitFailed,
}

/// A level generator using a geometric distribution.
///
/// Starting from level 0, a uniform variate in `[0, 1)` is drawn and the level
/// is promoted for as long as the draw falls below `p` and the level is below
/// the cap. Level `k` therefore occurs with probability close to
/// `p^k * (1 - p)`, truncated at `total - 1`.
///
/// With the default `p = 0.5` this gives an expected height of `O(log n)`
/// across `n` elements.
#[derive(Debug, Clone)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level. The random number generator is seeded from the operating system.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be at least 1
    /// and fit in an `i32`. Fails with [`GeometricError::RngInitFailed`] if the
    /// operating system cannot provide a seed.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::try_from_rng(&mut OsRng).map_err(|_err| GeometricError::RngInitFailed)?,
        })
    }

    /// Create a geometric level generator whose sequence of levels is fully
    /// determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same parameter validation as [`Geometric::new`].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// The probability that a node is promoted to the next level.
    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.p
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if i32::try_from(total).is_err() {
            return Err(GeometricError::MaxTooLarge);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }
}

impl Default for Geometric {
    /// `MAX_LEVEL + 1` levels with a promotion probability of one half, seeded
    /// from the thread-local generator.
    #[inline]
    fn default() -> Self {
        Geometric {
            total: MAX_LEVEL + 1,
            p: PROMOTION_PROBABILITY,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while self.rng.random::<f64>() < self.p && level + 1 < self.total {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, LevelGenerator};
    use crate::level_generator::geometric::GeometricError;
    use crate::MAX_LEVEL;

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
        assert_eq!(
            Geometric::with_seed(0, 0.5, 7).err(),
            Some(GeometricError::ZeroMax)
        );
    }

    #[test]
    fn invalid_p() {
        assert_eq!(
            Geometric::new(1, 0.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(1, 1.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::with_seed(4, f64::NAN, 7).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(GeometricError::ZeroMax.to_string(), "max must be non-zero.");
        assert_eq!(
            GeometricError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[test]
    fn default_matches_constants() {
        let generator = Geometric::default();
        assert_eq!(generator.total(), MAX_LEVEL + 1);
        assert_eq!(generator.probability(), 0.5);
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = Geometric::with_seed(17, 0.5, 42)?;
        let mut b = Geometric::with_seed(17, 0.5, 42)?;
        let left: Vec<_> = (0..1_000).map(|_| a.level()).collect();
        let right: Vec<_> = (0..1_000).map(|_| b.level()).collect();
        assert_eq!(left, right);
        Ok(())
    }

    #[test]
    fn half_of_levels_are_zero() -> Result<()> {
        let mut generator = Geometric::with_seed(17, 0.5, 1)?;
        let samples = 100_000;
        let zeros = (0..samples).filter(|_| generator.level() == 0).count();
        // Expected 50_000; this is many standard deviations wide.
        assert!((45_000..55_000).contains(&zeros), "zeros = {zeros}");
        Ok(())
    }

    #[rstest]
    fn new(
        #[values(1, 2, 17, 128)] n: usize,
        #[values(0.1, 0.5, 0.9)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::new(n, p)?;
        assert_eq!(generator.total(), n);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..n).contains(&level));
        }

        let mut found = false;
        for _ in 0..100_000 {
            if generator.level() == 0 {
                found = true;
                break;
            }
        }
        if !found {
            bail!("Failed to generate a level-0 node.");
        }

        Ok(())
    }
}
