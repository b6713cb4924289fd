//! Monte Carlo estimation of π.
//!
//! Points are drawn uniformly from the square `[-1, 1)²`; the fraction landing
//! inside the unit circle approaches π / 4. Work is split into batches and
//! batch `i` always draws from stream `i` of a ChaCha8 generator seeded with
//! the run's seed, so the total hit count depends only on the seed and the
//! batch layout, not on how many ranks share the work.

use rand::distributions::{Distribution, Uniform};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::error::{Error, Result};
use crate::evaluate::Evaluator;

#[derive(Debug, Clone)]
pub struct CircleSampler {
    seed: u64,
    batch_size: u64,
    range: Uniform<f64>,
}

impl CircleSampler {
    pub fn new(seed: u64, batch_size: u64) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::config("batch size must be at least 1"));
        }
        Ok(CircleSampler {
            seed,
            batch_size,
            range: Uniform::new(-1.0f64, 1.0),
        })
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Total tosses for `batches` units of work.
    pub fn tosses(&self, batches: u64) -> Result<u64> {
        batches
            .checked_mul(self.batch_size)
            .ok_or_else(|| Error::config("batches * batch size overflows u64"))
    }
}

impl Evaluator for CircleSampler {
    /// Tosses one batch and returns how many points fell inside the circle.
    fn evaluate(&self, index: u64) -> u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(index);
        let mut count = 0;
        for _ in 0..self.batch_size {
            let x = self.range.sample(&mut rng);
            let y = self.range.sample(&mut rng);
            if x * x + y * y <= 1.0 {
                count += 1;
            }
        }
        count
    }
}

/// π ≈ 4 · hits / tosses. Returns NaN when there were no tosses.
pub fn estimate_pi(hits: u64, tosses: u64) -> f64 {
    4.0 * hits as f64 / tosses as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(
            CircleSampler::new(0, 0),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn batches_are_reproducible() {
        let sampler = CircleSampler::new(7, 1_000).unwrap();
        assert_eq!(sampler.evaluate(3), sampler.evaluate(3));
        assert!(sampler.evaluate(3) <= 1_000);
    }

    #[test]
    fn estimate_is_close_to_pi() {
        let sampler = CircleSampler::new(0, 10_000).unwrap();
        let hits: u64 = (0..20).map(|i| sampler.evaluate(i)).sum();
        let pi = estimate_pi(hits, sampler.tosses(20).unwrap());
        assert!((pi - std::f64::consts::PI).abs() < 0.05, "estimate {pi}");
    }

    #[test]
    fn toss_count_overflow_is_a_configuration_error() {
        let sampler = CircleSampler::new(0, u64::MAX).unwrap();
        assert!(sampler.tosses(2).is_err());
    }
}
