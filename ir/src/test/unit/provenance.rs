//! Unit tests for provenance tracking.

use std::collections::{HashMap, HashSet};
use std::panic::Location;

use crate::provenance::{PROVENANCE_TRACKER, PassName, ProvenanceEvent, ProvenanceTracker};
use crate::{DType, Node, NodeKey, UnaryOp, replace_nodes};

#[test]
fn test_creation_is_captured() {
    let x = Node::input("x", DType::Float32, &[3]);

    PROVENANCE_TRACKER.with(|tracker| {
        let tracker = tracker.borrow();
        let events = tracker.get_events(x.id).expect("new node should have provenance");
        assert_eq!(events.len(), 1);

        match &events[0] {
            ProvenanceEvent::Created { location } => {
                assert!(location.file().ends_with("provenance.rs"), "caller location, got {location}");
            }
            other => panic!("expected Created event, got {other:?}"),
        }
    });
}

#[test]
fn test_shallow_clone_links_to_original() {
    let x = Node::input("x", DType::Float32, &[3]);
    let t = Node::unary(UnaryOp::Tanh, x);
    let clone = t.shallow_clone();

    PROVENANCE_TRACKER.with(|tracker| {
        let tracker = tracker.borrow();
        let events = tracker.get_events(clone.id).unwrap();
        assert!(events.contains(&ProvenanceEvent::Transformed { from_id: t.id, pass_name: PassName::ShallowClone }));

        // Lineage covers the original's creation followed by the clone's own events
        let lineage = tracker.lineage(clone.id);
        assert!(lineage.len() >= 3);
        assert!(matches!(lineage[0], ProvenanceEvent::Created { .. }));
        assert_eq!(lineage.last(), Some(&ProvenanceEvent::Transformed { from_id: t.id, pass_name: PassName::ShallowClone }));
    });
}

#[test]
#[allow(clippy::mutable_key_type)]
fn test_rebuild_is_recorded() {
    let x = Node::input("x", DType::Float32, &[3]);
    let y = Node::input("y", DType::Float32, &[3]);
    let e = Node::unary(UnaryOp::Exp, x.clone());

    let map = HashMap::from([(NodeKey(x.clone()), y)]);
    let rebuilt = replace_nodes(&[e.clone()], &map).unwrap().remove(0);
    assert_ne!(rebuilt.id, e.id);

    PROVENANCE_TRACKER.with(|tracker| {
        let tracker = tracker.borrow();
        let events = tracker.get_events(rebuilt.id).unwrap();
        assert!(events.contains(&ProvenanceEvent::Transformed { from_id: e.id, pass_name: PassName::Rebuild }));
    });
}

#[test]
fn test_disabled_tracker_records_nothing() {
    let mut tracker = ProvenanceTracker::default();
    tracker.set_enabled(false);
    assert!(!tracker.is_enabled());

    tracker.capture(1, Location::caller());
    tracker.record_transform(2, 1, PassName::Transform);
    assert!(tracker.is_empty());

    tracker.set_enabled(true);
    tracker.capture(1, Location::caller());
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_chain_survives_cycles() {
    let mut tracker = ProvenanceTracker::default();
    tracker.record_transform(1, 2, PassName::Rebuild);
    tracker.record_transform(2, 1, PassName::Rebuild);

    let lineage = tracker.lineage(1);
    assert_eq!(lineage.len(), 2);
}

#[test]
fn test_cleanup_with_live_set() {
    let mut tracker = ProvenanceTracker::default();
    tracker.capture(10, Location::caller());
    tracker.capture(11, Location::caller());

    tracker.cleanup_with_live_set(&HashSet::from([11]));
    assert!(tracker.get_events(10).is_none());
    assert!(tracker.get_events(11).is_some());

    tracker.clear();
    assert!(tracker.is_empty());
}
