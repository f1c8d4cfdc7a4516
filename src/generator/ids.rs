use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Where document ids come from during a run.
///
/// Random ids are drawn uniformly from `[0, u32::MAX]` with no collision
/// check; uniqueness under random assignment is best-effort only.
/// Sequential ids wrap to 0 after `u64::MAX`.
pub enum DocIdSource {
    Sequential { next: u64 },
    Random(Box<dyn RngCore + Send>),
}

impl DocIdSource {
    pub fn sequential(first: u64) -> Self {
        DocIdSource::Sequential { next: first }
    }

    /// Random ids from an entropy-seeded generator
    pub fn random() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Random ids from a reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        DocIdSource::Random(Box::new(rng))
    }

    pub fn next_id(&mut self) -> u64 {
        match self {
            DocIdSource::Sequential { next } => {
                let id = *next;
                *next = next.wrapping_add(1);
                id
            }
            DocIdSource::Random(rng) => u64::from(rng.gen::<u32>()),
        }
    }
}

impl std::fmt::Debug for DocIdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocIdSource::Sequential { next } => {
                f.debug_struct("Sequential").field("next", next).finish()
            }
            DocIdSource::Random(_) => f.write_str("Random"),
        }
    }
}
