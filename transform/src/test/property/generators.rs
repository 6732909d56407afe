//! Generators for property-based testing.
//!
//! A generated graph is a list of nodes built from a recipe over a few inputs,
//! with random sharing of earlier nodes, plus a mask choosing which operation
//! outputs get a transform.

use std::sync::Arc;

use glimpse_ir::{BinaryOp, DType, Node, UnaryOp};
use proptest::prelude::*;

#[derive(Debug, Clone)]
pub enum Step {
    Unary(UnaryOp, usize),
    Binary(BinaryOp, usize, usize),
}

pub fn arb_step() -> impl Strategy<Value = Step> {
    let unary = prop::sample::select(vec![UnaryOp::Neg, UnaryOp::Exp, UnaryOp::Tanh, UnaryOp::Relu]);
    let binary = prop::sample::select(vec![BinaryOp::Add, BinaryOp::Mul, BinaryOp::Max]);
    prop_oneof![
        (unary, any::<usize>()).prop_map(|(op, a)| Step::Unary(op, a)),
        (binary, any::<usize>(), any::<usize>()).prop_map(|(op, a, b)| Step::Binary(op, a, b)),
    ]
}

/// Generated graph.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Every node, inputs first, the root last.
    pub nodes: Vec<Arc<Node>>,
    /// Operation outputs chosen for tagging.
    pub tagged: Vec<Arc<Node>>,
}

impl Graph {
    pub fn root(&self) -> Arc<Node> {
        self.nodes.last().cloned().expect("graphs have at least one step")
    }
}

fn build(inputs: usize, steps: &[Step], mask: &[bool]) -> Graph {
    let mut nodes: Vec<Arc<Node>> =
        (0..inputs).map(|i| Node::input(format!("in{i}"), DType::Float32, &[3])).collect();

    for step in steps {
        let pick = |i: usize| nodes[i % nodes.len()].clone();
        let node = match step {
            Step::Unary(op, a) => Node::unary(*op, pick(*a)),
            Step::Binary(op, a, b) => Node::try_binary(*op, pick(*a), pick(*b)).expect("operands share shape"),
        };
        nodes.push(node);
    }

    let tagged = nodes[inputs..].iter().zip(mask).filter(|(_, tag)| **tag).map(|(node, _)| node.clone()).collect();
    Graph { nodes, tagged }
}

pub fn arb_graph(max_steps: usize) -> impl Strategy<Value = Graph> {
    (1usize..=3, prop::collection::vec(arb_step(), 1..=max_steps)).prop_flat_map(|(inputs, steps)| {
        let len = steps.len();
        prop::collection::vec(any::<bool>(), len).prop_map(move |mask| build(inputs, &steps, &mask))
    })
}
