use std::sync::Arc;

use bon::bon;
use glimpse_ir::{Distribution, Node};
use parking_lot::Mutex;

use crate::Result;
use crate::catalog::ensure_float;
use crate::hyper::{Hyperparameter, Hyperparameters};
use crate::random::{RandomSource, SeededStreams};

/// Multiply by a {0, 1} mask that keeps each element with probability `1 - p`.
///
/// `p` is read from the hyperparameter `key`. A literal `p <= 0` leaves the
/// node alone. With a tied mask the same mask node is used for every
/// application, e.g. across the steps of a recurrence.
#[derive(Debug)]
pub struct Dropout {
    key: String,
    rng: Option<Mutex<SeededStreams>>,
    mask: Option<Arc<Node>>,
}

#[bon]
impl Dropout {
    /// `seed` gives the transform its own random stream instead of the pass's.
    #[builder]
    pub fn builder(#[builder(into)] key: String, seed: Option<u64>, mask: Option<Arc<Node>>) -> Self {
        Self { key, rng: seed.map(|seed| Mutex::new(SeededStreams::new(seed))), mask }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mask(&self) -> Option<&Arc<Node>> {
        self.mask.as_ref()
    }

    pub(crate) fn apply(
        &self,
        x: &Arc<Node>,
        hyperparameters: &Hyperparameters,
        rng: &mut dyn RandomSource,
    ) -> Result<Arc<Node>> {
        let p = hyperparameters.require(&self.key)?;
        if p.is_disabled() {
            return Ok(x.clone());
        }
        ensure_float("dropout", x)?;

        let mask = match &self.mask {
            Some(mask) => mask.clone(),
            None => {
                let keep = keep_probability(p, x)?;
                match &self.rng {
                    Some(own) => own.lock().sample(Distribution::Bernoulli, x, keep),
                    None => rng.sample(Distribution::Bernoulli, x, keep),
                }
            }
        };

        Ok(Node::try_mul(x.clone(), mask)?)
    }
}

/// `1 - p`, folded for literals and built as a graph for symbolic `p`.
fn keep_probability(p: &Hyperparameter, x: &Node) -> Result<Arc<Node>> {
    Ok(match p {
        Hyperparameter::Scalar(p) => Node::constant(1.0 - p, x.dtype(), &[]),
        Hyperparameter::Node(p) => {
            ensure_float("dropout", p)?;
            Node::try_sub(Node::constant(1.0, p.dtype(), &[]), p.clone())?
        }
    })
}

impl std::fmt::Display for Dropout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mask {
            Some(_) => write!(f, "dropout({}, tied_mask)", self.key),
            None => write!(f, "dropout({})", self.key),
        }
    }
}
