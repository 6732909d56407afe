//! Registering pending transforms and extracting them again.

use std::sync::Arc;

use glimpse_ir::Node;

use crate::Result;
use crate::catalog::Transform;
use crate::error::{TransformOnGraphInputSnafu, TransformOnMultiOutputSnafu};
use crate::tags::{Reason, TagTable};

/// Append `transform` to the pending list of every node in `nodes` for `reason`.
///
/// # Errors
///
/// `TransformOnGraphInput` if any node is an INPUT or PARAM leaf, and
/// `TransformOnMultiOutput` if any node is a SCAN. Nodes are checked before
/// any is tagged, so a rejected call changes nothing.
pub fn add_transform(
    tags: &mut TagTable,
    nodes: &[Arc<Node>],
    transform: Arc<Transform>,
    reason: impl Into<Reason>,
) -> Result<()> {
    let reason = reason.into();
    let node_ids: Vec<u64> = nodes.iter().map(|node| node.id).collect();
    tracing::warn!(reason = %reason, transform = %transform, nodes = ?node_ids, "tagging for transform");

    if let Some(input) = nodes.iter().find(|node| node.is_graph_input()) {
        return TransformOnGraphInputSnafu { node_id: input.id, reason }.fail();
    }
    if let Some(producer) = nodes.iter().find(|node| node.has_inner_graph()) {
        return TransformOnMultiOutputSnafu { node_id: producer.id, reason }.fail();
    }

    for node in nodes {
        tags.entry(node).transforms.entry(reason.clone()).or_default().push(transform.clone());
    }
    Ok(())
}

/// Whether `node` has pending transforms for `reason`.
pub fn has_transforms(tags: &TagTable, node: &Node, reason: &Reason) -> bool {
    !tags.pending(node, reason).is_empty()
}

/// Take the pending transforms of `node` for `reason`.
///
/// With nothing pending, `node` itself is returned with an empty list and the
/// table is not touched. Otherwise `node` is shallow-cloned: the clone gets a
/// copy of `node`'s tags without `reason` (identity token included) and
/// `node`'s own tags stay as they were, so other references to it still see
/// the transforms.
pub fn pop_transforms(tags: &mut TagTable, node: &Arc<Node>, reason: &Reason) -> (Arc<Node>, Vec<Arc<Transform>>) {
    if !has_transforms(tags, node, reason) {
        return (node.clone(), Vec::new());
    }

    let mut bag = tags.get(node).cloned().unwrap_or_default();
    let transforms = bag.transforms.remove(reason).unwrap_or_default();

    let clone = node.shallow_clone();
    tags.insert(&clone, bag);
    (clone, transforms)
}
