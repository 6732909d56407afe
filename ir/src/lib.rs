//! Expression graph for the glimpse transform pipeline.
//!
//! This crate defines the computation graph that regularising transforms are
//! applied to, together with the machinery to rebuild it.
//!
//! # Module Organization
//!
//! - [`types`] - Element types, literals, operation kinds, distributions
//! - [`op`] - Operation enum (plain and graph-bearing operations)
//! - [`node`] - Node struct, identity key, constructors, traversal
//! - [`scan`] - Nested graphs carried by SCAN
//! - [`rewrite`] - Bottom-up substitution engine
//! - [`provenance`] - Creation/derivation history of nodes
//! - [`error`] - Error types and result handling
//! - [`shape`] - Static shapes

pub mod error;
pub mod node;
pub mod op;
pub mod prelude;
pub mod provenance;
pub mod rewrite;
pub mod scan;
pub mod shape;
pub mod types;

#[cfg(test)]
pub mod test;

pub use error::{Error, Result};
pub use node::{Node, NodeKey};
pub use op::Op;
pub use rewrite::{Rewriter, replace_nodes, substitute};
pub use scan::ScanBody;
pub use shape::Shape;
pub use types::{BinaryOp, ConstValue, DType, Distribution, UnaryOp};
