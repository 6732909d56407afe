//! Ancestor traversal that descends into scan bodies.

use std::collections::HashSet;
use std::sync::Arc;

use glimpse_ir::Node;

/// Every node reachable from `roots`, including nodes of nested scan bodies.
///
/// Post-order: each node comes after everything it depends on, body nodes
/// before the scan that carries them. Each node appears once. Iterative, with a
/// visited set keyed by node id, so captured outer nodes and deep graphs are
/// both safe.
pub fn deep_ancestors(roots: &[Arc<Node>]) -> Vec<Arc<Node>> {
    let mut visited = HashSet::new();
    let mut result = Vec::new();
    let mut stack: Vec<(Arc<Node>, bool)> = roots.iter().rev().map(|root| (root.clone(), false)).collect();

    while let Some((node, expanded)) = stack.pop() {
        if visited.contains(&node.id) {
            continue;
        }

        if expanded {
            visited.insert(node.id);
            result.push(node);
            continue;
        }

        stack.push((node.clone(), true));
        for child in node.children_deep().into_iter().rev() {
            if !visited.contains(&child.id) {
                stack.push((child, false));
            }
        }
    }

    result
}

/// Number of distinct nodes in [`deep_ancestors`] of `roots`.
pub fn graph_size(roots: &[Arc<Node>]) -> usize {
    deep_ancestors(roots).len()
}

/// Ids of [`deep_ancestors`] of `roots`, for pruning side tables.
pub fn live_ids(roots: &[Arc<Node>]) -> HashSet<u64> {
    deep_ancestors(roots).iter().map(|node| node.id).collect()
}
