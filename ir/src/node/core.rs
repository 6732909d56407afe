//! Core Node struct and fundamental operations.
//!
//! This module contains the [`Node`] struct definition and its core methods
//! for accessing operation data, cloning, rebuilding and graph traversal.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{NoNestedGraphSnafu, Result};
use crate::node::ids::next_node_id;
use crate::op::Op;
use crate::provenance::{PROVENANCE_TRACKER, PassName};
use crate::scan::ScanBody;
use crate::shape::Shape;
use crate::types::DType;

/// Wrapper for `Arc<Node>` that implements Hash and Eq based on the stable ID.
///
/// Two keys are equal iff they wrap the same node object. Structurally equal
/// nodes built separately are different keys.
#[derive(Clone)]
pub struct NodeKey(pub Arc<Node>);

// Show only the id, avoiding recursive printing of the whole graph
impl std::fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeKey(id={})", self.0.id)
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for NodeKey {}

impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

/// Vertex of the computation graph.
///
/// Nodes form a DAG where operations reference their inputs through the [`Op`]
/// enum. Nodes are immutable once built and are never hash-consed: every
/// constructor call, including [`Node::shallow_clone`], yields a distinct object
/// with its own `id`. Out-of-band metadata lives in side tables keyed by that id.
#[derive(derive_more::Debug)]
pub struct Node {
    /// Unique stable ID for this node object.
    pub id: u64,
    pub(crate) op: Op,
    pub(crate) dtype: DType,
    pub(crate) shape: Shape,
}

impl Node {
    /// Allocate a node and record where it was created.
    #[track_caller]
    pub(crate) fn new(op: Op, dtype: DType, shape: Shape) -> Arc<Self> {
        // Capture caller location before building the node
        let caller_location = std::panic::Location::caller();
        let node = Arc::new(Self { id: next_node_id(), op, dtype, shape });

        PROVENANCE_TRACKER.with(|tracker| {
            tracker.borrow_mut().capture(node.id, caller_location);
        });

        node
    }

    /// Get the operation.
    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Get the data type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Get the static shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Whether this node is an INPUT or PARAM leaf, i.e. not produced by any
    /// operation and not a literal.
    pub fn is_graph_input(&self) -> bool {
        matches!(self.op, Op::Input { .. } | Op::Param { .. })
    }

    /// Whether this node is a CONST leaf.
    pub fn is_constant(&self) -> bool {
        matches!(self.op, Op::Const(_))
    }

    /// Whether this node's operation embeds a nested graph.
    pub fn has_inner_graph(&self) -> bool {
        self.op.has_inner_graph()
    }

    /// Clone this node without cloning its ancestors.
    ///
    /// The clone shares every source `Arc` with the original and gets a fresh id,
    /// so side-table metadata keyed by id starts out empty for it.
    #[track_caller]
    pub fn shallow_clone(self: &Arc<Self>) -> Arc<Self> {
        let clone = Self::new(self.op.clone(), self.dtype, self.shape.clone());
        record_transform(clone.id, self.id, PassName::ShallowClone);
        clone
    }

    /// Rebuild this node's operation over `sources`.
    ///
    /// Leaves are returned as-is. For SCAN, `sources` replaces the sequences and
    /// the body is kept; use [`Node::with_body`] to replace both.
    pub fn with_sources(self: &Arc<Self>, sources: &[Arc<Self>]) -> Result<Arc<Self>> {
        self.op.check_arity(sources.len())?;

        let rebuilt = match &self.op {
            Op::Input { .. } | Op::Param { .. } | Op::Const(_) => return Ok(self.clone()),
            Op::Unary(op, _) => Self::unary(*op, sources[0].clone()),
            Op::Binary(op, ..) => Self::try_binary(*op, sources[0].clone(), sources[1].clone())?,
            Op::Random { dist, seed, .. } => {
                Self::random(*dist, sources[0].clone(), self.dtype, &self.shape, *seed)
            }
            Op::Scan { body, .. } => Self::scan(body.clone(), sources.to_vec())?,
            Op::Output { index, .. } => Self::output(&sources[0], *index)?,
        };

        record_transform(rebuilt.id, self.id, PassName::Rebuild);
        Ok(rebuilt)
    }

    /// Rebuild a SCAN node with a new body and new sequences.
    pub fn with_body(self: &Arc<Self>, body: Arc<ScanBody>, sequences: &[Arc<Self>]) -> Result<Arc<Self>> {
        snafu::ensure!(self.has_inner_graph(), NoNestedGraphSnafu { id: self.id, op: self.op.name() });
        self.op.check_arity(sequences.len())?;

        let rebuilt = Self::scan(body, sequences.to_vec())?;
        record_transform(rebuilt.id, self.id, PassName::Rebuild);
        Ok(rebuilt)
    }

    /// Direct sources plus, for graph-bearing nodes, the nested body outputs.
    pub fn children_deep(&self) -> SmallVec<[Arc<Self>; 4]> {
        let mut children = self.op.sources();
        if let Some(body) = self.op.nested() {
            children.extend(body.outputs().iter().cloned());
        }
        children
    }

    /// Topological sort of the graph reachable through direct sources.
    ///
    /// Returns nodes in an order where all dependencies come before their
    /// dependents. Nested bodies are not entered.
    pub fn toposort(self: &Arc<Self>) -> Vec<Arc<Self>> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![(self.clone(), false)];

        while let Some((node, processed)) = stack.pop() {
            if visited.contains(&node.id) {
                continue;
            }

            if processed {
                visited.insert(node.id);
                result.push(node);
            } else {
                stack.push((node.clone(), true));

                let mut children = Vec::new();
                node.op.map_child(|child| {
                    if !visited.contains(&child.id) {
                        children.push(child.clone());
                    }
                });

                // Push in reverse order for proper traversal
                for child in children.into_iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        result
    }

    /// Render this node and its sources as an ASCII tree, see [`render_tree`](crate::node::tree::render_tree).
    pub fn tree(self: &Arc<Self>) -> String {
        crate::node::tree::render_tree(self)
    }
}

pub(crate) fn record_transform(new_id: u64, old_id: u64, pass_name: PassName) {
    PROVENANCE_TRACKER.with(|tracker| {
        tracker.borrow_mut().record_transform(new_id, old_id, pass_name);
    });
}
