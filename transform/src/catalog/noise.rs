use std::sync::Arc;

use bon::bon;
use glimpse_ir::{Distribution, Node};
use parking_lot::Mutex;

use crate::Result;
use crate::catalog::ensure_float;
use crate::hyper::Hyperparameters;
use crate::random::{RandomSource, SeededStreams};

/// Add zero-mean Gaussian noise whose standard deviation is read from `key`.
#[derive(Debug, derive_more::Display)]
#[display("whitenoise({key})")]
pub struct WhiteNoise {
    key: String,
    rng: Option<Mutex<SeededStreams>>,
}

#[bon]
impl WhiteNoise {
    #[builder]
    pub fn builder(#[builder(into)] key: String, seed: Option<u64>) -> Self {
        Self { key, rng: seed.map(|seed| Mutex::new(SeededStreams::new(seed))) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn apply(
        &self,
        x: &Arc<Node>,
        hyperparameters: &Hyperparameters,
        rng: &mut dyn RandomSource,
    ) -> Result<Arc<Node>> {
        let std = hyperparameters.require(&self.key)?;
        if std.is_disabled() {
            return Ok(x.clone());
        }
        ensure_float("whitenoise", x)?;

        let std = std.to_node(x.dtype());
        let noise = match &self.rng {
            Some(own) => own.lock().sample(Distribution::Normal, x, std),
            None => rng.sample(Distribution::Normal, x, std),
        };

        Ok(Node::try_add(x.clone(), noise)?)
    }
}
