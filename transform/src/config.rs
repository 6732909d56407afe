//! Configuration for rewrite passes.
//!
//! Provides typed configuration with bon builders and environment overrides.

use std::sync::Arc;

use bon::bon;
use glimpse_ir::Node;
use glimpse_ir::provenance::PROVENANCE_TRACKER;

use crate::Result;
use crate::driver::apply_transforms;
use crate::hyper::Hyperparameters;
use crate::random::SeededStreams;
use crate::tags::{Reason, TagTable};

/// Ambient settings of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Seed of the pass's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Record provenance events while rewriting.
    pub record_provenance: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self { seed: None, record_provenance: true }
    }
}

#[bon]
impl RewriteConfig {
    /// Create a rewrite configuration with builder pattern.
    #[builder]
    pub fn builder(seed: Option<u64>, #[builder(default = true)] record_provenance: bool) -> Self {
        Self { seed, record_provenance }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `GLIMPSE_SEED` - Seed of the pass's random source (default: entropy)
    /// * `GLIMPSE_NO_PROVENANCE` - Disable provenance recording if set
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`RewriteConfig::from_env`], reading variables through `var`.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let seed = var("GLIMPSE_SEED").and_then(|s| s.parse().ok());
        let record_provenance = var("GLIMPSE_NO_PROVENANCE").is_none();

        Self { seed, record_provenance }
    }

    /// Random source for one pass.
    pub fn streams(&self) -> SeededStreams {
        match self.seed {
            Some(seed) => SeededStreams::new(seed),
            None => SeededStreams::from_entropy(),
        }
    }
}

/// A configured rewrite pass.
///
/// ```ignore
/// let rewrite = Rewrite::builder()
///     .reason("regularize")
///     .hyperparameters(Hyperparameters::new().with("dropout", 0.5))
///     .seed(7)
///     .build();
/// let new_roots = rewrite.run(&mut tags, &roots)?;
/// ```
#[derive(Debug, Clone)]
pub struct Rewrite {
    reason: Reason,
    hyperparameters: Hyperparameters,
    config: RewriteConfig,
}

#[bon]
impl Rewrite {
    /// `seed` overrides the seed of `config`. Without `config` the environment
    /// is read, see [`RewriteConfig::from_env`].
    #[builder]
    pub fn builder(
        #[builder(into)] reason: Reason,
        #[builder(default)] hyperparameters: Hyperparameters,
        config: Option<RewriteConfig>,
        seed: Option<u64>,
    ) -> Self {
        let mut config = config.unwrap_or_else(RewriteConfig::from_env);
        if seed.is_some() {
            config.seed = seed;
        }
        Self { reason, hyperparameters, config }
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Run the pass with a random source seeded from the configuration.
    pub fn run(&self, tags: &mut TagTable, roots: &[Arc<Node>]) -> Result<Vec<Arc<Node>>> {
        let previous = PROVENANCE_TRACKER.with(|tracker| {
            let mut tracker = tracker.borrow_mut();
            let previous = tracker.is_enabled();
            tracker.set_enabled(self.config.record_provenance);
            previous
        });

        let mut rng = self.config.streams();
        let result = apply_transforms(tags, roots, &self.reason, &self.hyperparameters, &mut rng);

        PROVENANCE_TRACKER.with(|tracker| tracker.borrow_mut().set_enabled(previous));
        result
    }
}
