//! Graph substitution.
//!
//! This module implements the bottom-up rebuild that applies per-node
//! replacements to graphs, descending into scan bodies.

pub mod engine;

pub use engine::{Rewriter, replace_nodes, substitute};
