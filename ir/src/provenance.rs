//! Provenance tracking for nodes.
//!
//! Records where each node was created and which node it was derived from:
//! a shallow clone, a rebuild over replaced sources, or a transform
//! replacement. Records live in a thread-local table outside the nodes and are
//! only read when an error is reported.
//!
//! The table is never pruned on its own. Long-running callers that rewrite
//! repeatedly drop records of dead nodes with
//! [`ProvenanceTracker::cleanup_with_live_set`], or switch recording off.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::panic::Location;

use derive_more::Display;

/// How a node was derived from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PassName {
    #[display("shallow_clone")]
    ShallowClone,
    #[display("rebuild")]
    Rebuild,
    /// Replacement produced by a registered transform
    #[display("transform")]
    Transform,
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ProvenanceEvent {
    #[display("created at {location}")]
    Created { location: &'static Location<'static> },

    #[display("derived from node {from_id} by {pass_name}")]
    Transformed { from_id: u64, pass_name: PassName },
}

impl ProvenanceEvent {
    fn parent(&self) -> Option<u64> {
        match self {
            Self::Transformed { from_id, .. } => Some(*from_id),
            Self::Created { .. } => None,
        }
    }
}

pub struct ProvenanceTracker {
    events: HashMap<u64, Vec<ProvenanceEvent>>,
    enabled: bool,
}

impl Default for ProvenanceTracker {
    fn default() -> Self {
        Self { events: HashMap::new(), enabled: true }
    }
}

impl ProvenanceTracker {
    pub fn capture(&mut self, node_id: u64, location: &'static Location<'static>) {
        if self.enabled {
            self.events.entry(node_id).or_default().push(ProvenanceEvent::Created { location });
        }
    }

    /// Record that `new_id` was derived from `old_id`.
    pub fn record_transform(&mut self, new_id: u64, old_id: u64, pass_name: PassName) {
        if self.enabled {
            self.events.entry(new_id).or_default().push(ProvenanceEvent::Transformed { from_id: old_id, pass_name });
        }
    }

    /// Turn recording on or off. Already recorded events are kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_events(&self, node_id: u64) -> Option<&[ProvenanceEvent]> {
        self.events.get(&node_id).map(Vec::as_slice)
    }

    /// Events of `node_id` and of every node it was derived from, oldest first.
    pub fn lineage(&self, node_id: u64) -> Vec<ProvenanceEvent> {
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(node_id);

        while let Some(id) = next.take() {
            if !seen.insert(id) {
                break;
            }
            ids.push(id);
            next = self.events.get(&id).and_then(|events| events.iter().find_map(ProvenanceEvent::parent));
        }

        ids.iter().rev().filter_map(|id| self.events.get(id)).flatten().cloned().collect()
    }

    /// Remove records of nodes outside `live_nodes`.
    pub fn cleanup_with_live_set(&mut self, live_nodes: &HashSet<u64>) {
        self.events.retain(|id, _| live_nodes.contains(id));
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

thread_local! {
    pub static PROVENANCE_TRACKER: RefCell<ProvenanceTracker> = RefCell::default();
}
