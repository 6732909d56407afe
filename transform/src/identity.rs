//! Identity tokens.

use std::sync::Arc;

use glimpse_ir::Node;

use crate::tags::{OriginId, TagTable};

/// Assign `node` an identity token unless it already has one.
///
/// Returns the node's token, old or new.
pub fn tag_with_id(tags: &mut TagTable, node: &Node) -> OriginId {
    *tags.entry(node).origin.get_or_insert(OriginId(node.id))
}

pub fn tag_with_ids<'a>(tags: &mut TagTable, nodes: impl IntoIterator<Item = &'a Arc<Node>>) {
    for node in nodes {
        tag_with_id(tags, node);
    }
}
