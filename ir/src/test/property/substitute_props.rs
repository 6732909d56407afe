//! Properties of the substitution engine on generated DAGs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use super::generators::arb_graph;
use crate::{DType, Node, NodeKey, Rewriter, replace_nodes, substitute};

/// Keeps every node and records the order nodes were offered in.
#[derive(Default)]
struct Recorder {
    offered: Vec<u64>,
}

impl Rewriter for Recorder {
    type Error = crate::Error;

    fn rewrite(&mut self, node: Arc<Node>) -> crate::Result<Arc<Node>> {
        self.offered.push(node.id);
        Ok(node)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn identity_substitute_returns_same_root(nodes in arb_graph(24)) {
        let root = nodes.last().unwrap().clone();
        let out = substitute(&[root.clone()], &mut Recorder::default()).unwrap();
        prop_assert!(Arc::ptr_eq(&out[0], &root));
    }

    #[test]
    fn every_reachable_node_offered_once_after_children(nodes in arb_graph(24)) {
        let root = nodes.last().unwrap().clone();
        let mut recorder = Recorder::default();
        substitute(&[root.clone()], &mut recorder).unwrap();

        let reachable: HashSet<u64> = root.toposort().iter().map(|n| n.id).collect();
        let offered: HashSet<u64> = recorder.offered.iter().copied().collect();
        prop_assert_eq!(offered.len(), recorder.offered.len(), "a node was offered twice");
        prop_assert_eq!(&offered, &reachable);

        let position: HashMap<u64, usize> = recorder.offered.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        for node in root.toposort() {
            for src in node.op().sources() {
                prop_assert!(position[&src.id] < position[&node.id]);
            }
        }
    }

    #[test]
    #[allow(clippy::mutable_key_type)]
    fn replacing_unreachable_node_changes_nothing(nodes in arb_graph(24)) {
        let root = nodes.last().unwrap().clone();
        let stray = Node::input("stray", DType::Float32, &[3]);
        let map = HashMap::from([(NodeKey(stray), Node::scalar(0.0))]);

        let out = replace_nodes(&[root.clone()], &map).unwrap();
        prop_assert!(Arc::ptr_eq(&out[0], &root));
    }

    #[test]
    #[allow(clippy::mutable_key_type)]
    fn replaced_input_disappears(nodes in arb_graph(24)) {
        let root = nodes.last().unwrap().clone();
        let target = nodes[0].clone();
        let fresh = Node::input("fresh", DType::Float32, &[3]);
        let map = HashMap::from([(NodeKey(target.clone()), fresh.clone())]);

        let out = replace_nodes(&[root.clone()], &map).unwrap().remove(0);
        let ids: HashSet<u64> = out.toposort().iter().map(|n| n.id).collect();
        let reached = root.toposort().iter().any(|n| n.id == target.id);

        prop_assert!(!ids.contains(&target.id));
        prop_assert_eq!(ids.contains(&fresh.id), reached);
        prop_assert_eq!(Arc::ptr_eq(&out, &root), !reached);
    }
}
