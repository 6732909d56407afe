//! Out-of-band tag table.
//!
//! Nodes are immutable, so everything a rewrite pass needs to remember about a
//! node lives here, keyed by node id: the identity token assigned at first
//! tagging and the pending transforms per reason.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use glimpse_ir::Node;

use crate::catalog::Transform;

/// Named category of rewrite, e.g. `"regularize"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct Reason(String);

impl Reason {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Reason {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Reason {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identity token recognising a node across clones.
///
/// Holds the id of the node object it was first assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("origin#{_0}")]
pub struct OriginId(pub u64);

/// Tag bag of a single node.
#[derive(Debug, Clone, Default)]
pub struct Tags {
    pub(crate) origin: Option<OriginId>,
    pub(crate) transforms: BTreeMap<Reason, Vec<Arc<Transform>>>,
}

impl Tags {
    pub fn origin(&self) -> Option<OriginId> {
        self.origin
    }

    /// Pending transforms for `reason`, in registration order.
    pub fn transforms(&self, reason: &Reason) -> &[Arc<Transform>] {
        self.transforms.get(reason).map(Vec::as_slice).unwrap_or_default()
    }

    /// Reasons with pending transforms.
    pub fn reasons(&self) -> impl Iterator<Item = &Reason> {
        self.transforms.keys()
    }
}

/// Side table from node id to [`Tags`].
///
/// Owned by whoever builds the graph and lent mutably to registration and
/// rewrite passes, one at a time.
#[derive(Debug, Default)]
pub struct TagTable {
    entries: HashMap<u64, Tags>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: &Node) -> Option<&Tags> {
        self.entries.get(&node.id)
    }

    /// Identity token of `node`, if it was tagged.
    pub fn origin(&self, node: &Node) -> Option<OriginId> {
        self.get(node).and_then(Tags::origin)
    }

    /// Pending transforms of `node` for `reason`.
    pub fn pending(&self, node: &Node, reason: &Reason) -> &[Arc<Transform>] {
        self.get(node).map(|tags| tags.transforms(reason)).unwrap_or_default()
    }

    /// Copy the tag bag of `from` onto `to`, replacing whatever `to` had.
    ///
    /// Nothing happens when `from` has no tags.
    pub fn inherit(&mut self, from: &Node, to: &Node) {
        if let Some(tags) = self.entries.get(&from.id).cloned() {
            self.entries.insert(to.id, tags);
        }
    }

    pub(crate) fn entry(&mut self, node: &Node) -> &mut Tags {
        self.entries.entry(node.id).or_default()
    }

    pub(crate) fn insert(&mut self, node: &Node, tags: Tags) {
        self.entries.insert(node.id, tags);
    }

    pub(crate) fn remove(&mut self, node: &Node) -> Option<Tags> {
        self.entries.remove(&node.id)
    }

    /// Drop entries of nodes that are no longer part of any live graph.
    ///
    /// Every pass adds entries for the clones and rebuilt nodes it creates, so
    /// callers that keep only the newest roots prune between passes:
    ///
    /// ```ignore
    /// tags.retain_live(&live_ids(&roots));
    /// ```
    pub fn retain_live(&mut self, live: &HashSet<u64>) {
        self.entries.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
