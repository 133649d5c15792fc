use crate::config::SamplingConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pluggable choice source for grammar sampling.
///
/// Used in two places: picking which production to fire, and picking which
/// matching node a production rewrites. Swapping the sampler is how callers
/// get reproducible runs.
pub trait Sampler {
    /// Pick an index in `0..len`. Callers guarantee `len > 0`.
    fn choice(&mut self, len: usize) -> usize;
}

/// Uniform random sampler backed by a seedable RNG.
pub struct UniformSampler {
    rng: StdRng,
}

impl UniformSampler {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    /// Sampler configured per the sampling config section.
    pub fn from_config(config: &SamplingConfig) -> Self {
        Self::from_seed_option(config.seed)
    }
}

impl Default for UniformSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for UniformSampler {
    fn choice(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always picks the first element. Deterministic alternative for tests and
/// reproducible expansions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSampler;

impl Sampler for FirstSampler {
    fn choice(&mut self, _len: usize) -> usize {
        0
    }
}
