//! Operation enum and implementation.
//!
//! The [`Op`] enum defines every operation a [`Node`] can carry. Each variant
//! encodes its operand structure directly, so arity is checked at compile time.
//!
//! Operations fall into two families:
//! - plain operations, whose only inputs are their direct sources
//! - graph-bearing operations ([`Op::Scan`]), which additionally embed a nested
//!   [`ScanBody`] whose nodes are not reachable through [`Op::sources`]

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{ArityMismatchSnafu, Result};
use crate::node::Node;
use crate::scan::ScanBody;
use crate::types::{BinaryOp, ConstValue, Distribution, UnaryOp};

/// Operation type with typed operands.
///
/// Note: PartialEq, Eq and Hash are NOT derived because Op contains `Arc<Node>`.
/// Identity-based maps use [`crate::NodeKey`], which compares by node id.
#[derive(Debug, Clone)]
pub enum Op {
    // Leaves
    /// Outer graph input.
    Input { name: String },
    /// Scan body input placeholder, bound to sequence `index` per step.
    Param { index: usize },
    /// Literal broadcast to the node's shape.
    Const(ConstValue),

    // Elementwise
    Unary(UnaryOp, Arc<Node>),
    Binary(BinaryOp, Arc<Node>, Arc<Node>),

    /// Sample of `dist` parameterised by `param`, shaped like the node.
    Random { dist: Distribution, param: Arc<Node>, seed: u64 },

    // Graph-bearing
    /// Iterate `body` over the leading axis of `sequences`.
    Scan { body: Arc<ScanBody>, sequences: SmallVec<[Arc<Node>; 4]> },
    /// Output `index` of a multi-output producer.
    Output { src: Arc<Node>, index: usize },
}

impl Op {
    /// Direct input edges of this operation.
    ///
    /// Nested body nodes of graph-bearing operations are NOT included; use
    /// [`Op::nested`] or [`Node::children_deep`] to reach them.
    pub fn sources(&self) -> SmallVec<[Arc<Node>; 4]> {
        let mut sources = SmallVec::new();
        self.map_child(|child| sources.push(child.clone()));
        sources
    }

    /// Call `f` on every direct source without allocating.
    pub fn map_child<F>(&self, mut f: F)
    where
        F: FnMut(&Arc<Node>),
    {
        match self {
            Op::Input { .. } | Op::Param { .. } | Op::Const(_) => {}
            Op::Unary(_, src) => f(src),
            Op::Binary(_, lhs, rhs) => {
                f(lhs);
                f(rhs);
            }
            Op::Random { param, .. } => f(param),
            Op::Scan { sequences, .. } => sequences.iter().for_each(f),
            Op::Output { src, .. } => f(src),
        }
    }

    /// Nested graph embedded in this operation, if any.
    pub fn nested(&self) -> Option<&Arc<ScanBody>> {
        match self {
            Op::Scan { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether this operation carries a nested graph.
    pub fn has_inner_graph(&self) -> bool {
        self.nested().is_some()
    }

    /// Whether this operation has no sources at all.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Op::Input { .. } | Op::Param { .. } | Op::Const(_))
    }

    /// Number of direct sources this operation expects.
    pub fn arity(&self) -> usize {
        match self {
            Op::Input { .. } | Op::Param { .. } | Op::Const(_) => 0,
            Op::Unary(..) | Op::Random { .. } | Op::Output { .. } => 1,
            Op::Binary(..) => 2,
            Op::Scan { sequences, .. } => sequences.len(),
        }
    }

    /// Check `actual` sources against this operation's arity.
    pub(crate) fn check_arity(&self, actual: usize) -> Result<()> {
        let expected = self.arity();
        snafu::ensure!(expected == actual, ArityMismatchSnafu { op: self.name(), expected, actual });
        Ok(())
    }

    /// Upper-case operation name, e.g. `"BINARY"`.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Input { .. } => "INPUT",
            Op::Param { .. } => "PARAM",
            Op::Const(_) => "CONST",
            Op::Unary(..) => "UNARY",
            Op::Binary(..) => "BINARY",
            Op::Random { .. } => "RANDOM",
            Op::Scan { .. } => "SCAN",
            Op::Output { .. } => "OUTPUT",
        }
    }
}
