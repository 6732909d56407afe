//! Node implementation.
//!
//! # Module Organization
//!
//! - [`core`] - Node struct, identity key, cloning, rebuilding and traversal
//! - [`constructors`] - Constructor methods by semantic category
//! - [`tree`] - ASCII tree rendering

pub mod constructors;
pub mod core;
pub(crate) mod ids;
pub mod tree;

pub use core::{Node, NodeKey};
