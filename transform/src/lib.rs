//! Tag-driven transform application over glimpse-ir graphs.
//!
//! Transforms such as dropout, additive noise or ablation are registered on
//! nodes under a reason while the graph is built, then resolved in one pass:
//!
//! ```ignore
//! let mut tags = TagTable::new();
//! add_transform(&mut tags, &[h.clone()], Transform::dropout("dropout"), "regularize")?;
//!
//! let hyperparameters = Hyperparameters::new().with("dropout", 0.5);
//! let mut rng = SeededStreams::new(0);
//! let roots = apply_transforms(&mut tags, &[loss], &"regularize".into(), &hyperparameters, &mut rng)?;
//! ```
//!
//! # Module Organization
//!
//! - [`tags`] - Tag side-table, reasons and identity tokens
//! - [`identity`] - Identity tagging
//! - [`walk`] - Deep ancestor traversal
//! - [`registry`] - Registering and extracting pending transforms
//! - [`driver`] - The rewrite pass
//! - [`catalog`] - Dropout, white noise, constant replacement, custom
//! - [`random`] - Random sources
//! - [`hyper`] - Hyperparameter bag
//! - [`config`] - Pass configuration
//! - [`error`] - Error types and result handling

pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod hyper;
pub mod identity;
pub mod random;
pub mod registry;
pub mod tags;
pub mod walk;


pub use catalog::{ConstantReplace, Dropout, Transform, TransformFn, TransformId, TransformKind, WhiteNoise};
pub use config::{Rewrite, RewriteConfig};
pub use driver::apply_transforms;
pub use error::{Error, Result};
pub use hyper::{Hyperparameter, Hyperparameters};
pub use identity::{tag_with_id, tag_with_ids};
pub use random::{RandomSource, SeededStreams};
pub use registry::{add_transform, has_transforms, pop_transforms};
pub use tags::{OriginId, Reason, TagTable, Tags};
pub use walk::{deep_ancestors, graph_size, live_ids};
