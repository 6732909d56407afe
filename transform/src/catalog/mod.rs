//! Transform catalog.
//!
//! A [`Transform`] maps a node and the pass's hyperparameters to a replacement
//! node. Each transform object has its own [`TransformId`]; the rewrite driver
//! memoizes on it, so registering one `Arc<Transform>` on several nodes shares
//! replacements while two separately built transforms never do.
//!
//! # Kinds
//!
//! - [`Dropout`] - multiply by a keep mask
//! - [`WhiteNoise`] - add Gaussian noise
//! - [`ConstantReplace`] - swap in a fixed node
//! - [`TransformKind::Custom`] - anything implementing [`TransformFn`]

pub mod constant;
pub mod dropout;
pub mod noise;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glimpse_ir::Node;

pub use constant::ConstantReplace;
pub use dropout::Dropout;
pub use noise::WhiteNoise;

use crate::Result;
use crate::error::NonFloatOperandSnafu;
use crate::hyper::Hyperparameters;
use crate::random::RandomSource;

static NEXT_TRANSFORM_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("transform#{_0}")]
pub struct TransformId(u64);

impl TransformId {
    fn next() -> Self {
        Self(NEXT_TRANSFORM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Reject `node` unless it holds floats; literals derived from it are floats.
pub(crate) fn ensure_float(transform: &'static str, node: &Node) -> Result<()> {
    snafu::ensure!(node.dtype().is_float(), NonFloatOperandSnafu { transform, node_id: node.id, dtype: node.dtype() });
    Ok(())
}

/// User-defined transform.
///
/// `Display` is what registration logs show.
pub trait TransformFn: fmt::Debug + fmt::Display + Send + Sync {
    fn apply(
        &self,
        node: &Arc<Node>,
        hyperparameters: &Hyperparameters,
        rng: &mut dyn RandomSource,
    ) -> Result<Arc<Node>>;
}

#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum TransformKind {
    Dropout(Dropout),
    WhiteNoise(WhiteNoise),
    Constant(ConstantReplace),
    Custom(Arc<dyn TransformFn>),
}

#[derive(Debug, derive_more::Display)]
#[display("{kind}")]
pub struct Transform {
    id: TransformId,
    kind: TransformKind,
}

impl Transform {
    pub fn new(kind: impl Into<TransformKind>) -> Arc<Self> {
        Arc::new(Self { id: TransformId::next(), kind: kind.into() })
    }

    /// Dropout reading its probability from `key`, sampling from the pass's source.
    pub fn dropout(key: impl Into<String>) -> Arc<Self> {
        Self::new(Dropout::builder().key(key).build())
    }

    /// White noise reading its standard deviation from `key`.
    pub fn white_noise(key: impl Into<String>) -> Arc<Self> {
        Self::new(WhiteNoise::builder().key(key).build())
    }

    pub fn constant(replacement: Arc<Node>) -> Arc<Self> {
        Self::new(ConstantReplace::new(replacement))
    }

    pub fn custom(transform: impl TransformFn + 'static) -> Arc<Self> {
        Self::new(TransformKind::Custom(Arc::new(transform)))
    }

    pub fn id(&self) -> TransformId {
        self.id
    }

    pub fn kind(&self) -> &TransformKind {
        &self.kind
    }

    /// Build the replacement for `node`.
    ///
    /// Returning `node` itself means the transform had nothing to do.
    pub fn apply(
        &self,
        node: &Arc<Node>,
        hyperparameters: &Hyperparameters,
        rng: &mut dyn RandomSource,
    ) -> Result<Arc<Node>> {
        match &self.kind {
            TransformKind::Dropout(dropout) => dropout.apply(node, hyperparameters, rng),
            TransformKind::WhiteNoise(noise) => noise.apply(node, hyperparameters, rng),
            TransformKind::Constant(constant) => Ok(constant.apply()),
            TransformKind::Custom(custom) => custom.apply(node, hyperparameters, rng),
        }
    }
}
