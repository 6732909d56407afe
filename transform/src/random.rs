//! Random sources producing RANDOM nodes.

use std::sync::Arc;

use glimpse_ir::{Distribution, Node};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of sampled tensors.
pub trait RandomSource {
    /// A sample of `dist` with parameter `param`, with the dtype and shape of `like`.
    fn sample(&mut self, dist: Distribution, like: &Node, param: Arc<Node>) -> Arc<Node>;
}

/// Seed-driven random source.
///
/// Every sample gets its own seed drawn from one stream, so two sources
/// created with the same seed produce identical graphs.
#[derive(Debug, Clone)]
pub struct SeededStreams {
    rng: StdRng,
}

impl SeededStreams {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Next per-sample seed.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

impl RandomSource for SeededStreams {
    fn sample(&mut self, dist: Distribution, like: &Node, param: Arc<Node>) -> Arc<Node> {
        let seed = self.next_seed();
        tracing::trace!(%dist, like.id = like.id, seed, "sampling");
        Node::random(dist, param, like.dtype(), like.shape(), seed)
    }
}
