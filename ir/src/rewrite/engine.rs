//! Graph substitution engine.
//!
//! Visits every node reachable from a set of roots, including nodes that live
//! inside scan bodies, and rebuilds the graph bottom-up while a [`Rewriter`]
//! chooses a replacement for each node.
//!
//! # Algorithm
//!
//! Each node goes through 2 stages on an explicit stack:
//! - Stage 0 (Visit): schedule the node's finalize, then push its children
//!   (direct sources followed by nested body outputs)
//! - Stage 1 (Finalize): collect the children's results, rebuild the node if
//!   any child changed, hand the (possibly rebuilt) node to the rewriter and
//!   link the original to the rewriter's answer
//!
//! Results are keyed by node id and shared across nesting levels, so a node
//! captured by a scan body from the enclosing graph resolves to the same
//! replacement inside and outside the body. Replacements are final: the engine
//! never revisits what a rewriter returns.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{Node, NodeKey};

/// Per-node callback driving [`substitute`].
pub trait Rewriter {
    /// Error type of a failed rewrite. Rebuild failures convert into it.
    type Error: From<crate::Error>;

    /// Called after `original` was rebuilt as `rebuilt` because some of its
    /// children were replaced, before `rewrite` sees `rebuilt`.
    ///
    /// Side tables keyed by node id use this to follow the node.
    fn rebuilt(&mut self, original: &Arc<Node>, rebuilt: &Arc<Node>) {
        let _ = (original, rebuilt);
    }

    /// Choose the replacement for `node`. Returning `node` keeps it.
    fn rewrite(&mut self, node: Arc<Node>) -> Result<Arc<Node>, Self::Error>;
}

/// Stage in the 2-stage substitution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Visit,
    Finalize,
}

#[derive(Debug, Clone)]
struct StackEntry {
    node: Arc<Node>,
    stage: Stage,
}

impl StackEntry {
    fn visit(node: Arc<Node>) -> Self {
        Self { node, stage: Stage::Visit }
    }

    fn finalize(node: Arc<Node>) -> Self {
        Self { node, stage: Stage::Finalize }
    }
}

struct SubstituteEngine<'a, R> {
    rewriter: &'a mut R,

    /// Final results cache: maps original node → replacement
    results: HashMap<NodeKey, Arc<Node>>,

    /// Nodes whose finalize is on the stack. Prevents duplicate pushes in
    /// DAGs and stops descent into anything that is already being processed.
    scheduled: HashSet<u64>,
}

impl<'a, R: Rewriter> SubstituteEngine<'a, R> {
    fn new(rewriter: &'a mut R) -> Self {
        Self { rewriter, results: HashMap::new(), scheduled: HashSet::new() }
    }

    fn result(&self, node: &Arc<Node>) -> Arc<Node> {
        self.results.get(&NodeKey(node.clone())).cloned().unwrap_or_else(|| node.clone())
    }

    fn is_done(&self, node: &Arc<Node>) -> bool {
        self.results.contains_key(&NodeKey(node.clone()))
    }

    fn handle_visit(&mut self, stack: &mut Vec<StackEntry>, node: Arc<Node>) {
        if !self.scheduled.insert(node.id) {
            return;
        }

        stack.push(StackEntry::finalize(node.clone()));

        // Reverse order so children are processed in source order
        for child in node.children_deep().into_iter().rev() {
            if !self.is_done(&child) && !self.scheduled.contains(&child.id) {
                stack.push(StackEntry::visit(child));
            }
        }
    }

    fn handle_finalize(&mut self, node: Arc<Node>) -> Result<(), R::Error> {
        let sources = node.op().sources();
        let new_sources: Vec<Arc<Node>> = sources.iter().map(|src| self.result(src)).collect();
        let sources_changed = sources.iter().zip(&new_sources).any(|(old, new)| !Arc::ptr_eq(old, new));

        let new_body = node.op().nested().and_then(|body| {
            let outputs: Vec<Arc<Node>> = body.outputs().iter().map(|out| self.result(out)).collect();
            let changed = body.outputs().iter().zip(&outputs).any(|(old, new)| !Arc::ptr_eq(old, new));
            changed.then(|| body.with_outputs(outputs))
        });

        let working = match new_body {
            Some(body) => Some(node.with_body(body, &new_sources)?),
            None if sources_changed => Some(node.with_sources(&new_sources)?),
            None => None,
        };

        let working = match working {
            Some(rebuilt) => {
                tracing::trace!(node.id = node.id, rebuilt.id = rebuilt.id, "rebuilt over replaced children");
                self.rewriter.rebuilt(&node, &rebuilt);
                rebuilt
            }
            None => node.clone(),
        };

        let replacement = self.rewriter.rewrite(working)?;
        self.scheduled.remove(&node.id);
        self.results.insert(NodeKey(node), replacement);
        Ok(())
    }

    fn substitute(&mut self, root: &Arc<Node>) -> Result<Arc<Node>, R::Error> {
        if self.is_done(root) {
            return Ok(self.result(root));
        }

        let mut stack = vec![StackEntry::visit(root.clone())];

        while let Some(StackEntry { node, stage }) = stack.pop() {
            if self.is_done(&node) {
                continue;
            }

            match stage {
                Stage::Visit => self.handle_visit(&mut stack, node),
                Stage::Finalize => self.handle_finalize(node)?,
            }
        }

        Ok(self.result(root))
    }
}

/// Rebuild the graphs rooted at `roots`, replacing nodes as `rewriter` decides.
///
/// Every reachable node, including nodes inside scan bodies, is offered to the
/// rewriter exactly once, after all of its children. Roots are returned in the
/// order given. Any error aborts the whole substitution.
///
/// # Example
///
/// ```ignore
/// struct KeepAll;
/// impl Rewriter for KeepAll {
///     type Error = glimpse_ir::Error;
///     fn rewrite(&mut self, node: Arc<Node>) -> Result<Arc<Node>, Self::Error> {
///         Ok(node)
///     }
/// }
/// let new_roots = substitute(&[root], &mut KeepAll)?;
/// ```
pub fn substitute<R: Rewriter>(roots: &[Arc<Node>], rewriter: &mut R) -> Result<Vec<Arc<Node>>, R::Error> {
    let mut engine = SubstituteEngine::new(rewriter);
    roots.iter().map(|root| engine.substitute(root)).collect()
}

/// Rewriter that swaps nodes found in a fixed map.
///
/// Rebuilt nodes are looked up under the key of the node they were rebuilt
/// from, so a mapped node still matches after its children were replaced.
struct MapRewriter<'a> {
    map: &'a HashMap<NodeKey, Arc<Node>>,
    rebuilt_from: HashMap<u64, Arc<Node>>,
}

impl Rewriter for MapRewriter<'_> {
    type Error = crate::Error;

    fn rebuilt(&mut self, original: &Arc<Node>, rebuilt: &Arc<Node>) {
        self.rebuilt_from.insert(rebuilt.id, original.clone());
    }

    fn rewrite(&mut self, node: Arc<Node>) -> crate::Result<Arc<Node>> {
        let original = self.rebuilt_from.get(&node.id).cloned().unwrap_or_else(|| node.clone());
        Ok(self.map.get(&NodeKey(original)).cloned().unwrap_or(node))
    }
}

/// Replace nodes according to a substitution map.
///
/// Dependents of replaced nodes are rebuilt; everything else is shared with the
/// input graph.
#[allow(clippy::mutable_key_type)]
pub fn replace_nodes(roots: &[Arc<Node>], map: &HashMap<NodeKey, Arc<Node>>) -> crate::Result<Vec<Arc<Node>>> {
    substitute(roots, &mut MapRewriter { map, rebuilt_from: HashMap::new() })
}
