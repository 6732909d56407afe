//! Generators for property-based testing.
//!
//! Graphs are generated as recipes (lists of steps over earlier nodes) and then
//! built, so every generated graph is a valid DAG with shared subexpressions.

use std::sync::Arc;

use proptest::prelude::*;
use strum::IntoEnumIterator;

use crate::types::{BinaryOp, UnaryOp};
use crate::{DType, Node};

/// Shape shared by every generated node.
pub const SHAPE: [usize; 1] = [3];

/// One construction step; operands index earlier nodes modulo their count.
#[derive(Debug, Clone)]
pub enum Step {
    Unary(UnaryOp, usize),
    Binary(BinaryOp, usize, usize),
    Constant(i64),
}

pub fn arb_unary_op() -> impl Strategy<Value = UnaryOp> {
    prop::sample::select(UnaryOp::iter().collect::<Vec<_>>())
}

pub fn arb_binary_op() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(BinaryOp::iter().collect::<Vec<_>>())
}

pub fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (arb_unary_op(), any::<usize>()).prop_map(|(op, a)| Step::Unary(op, a)),
        5 => (arb_binary_op(), any::<usize>(), any::<usize>()).prop_map(|(op, a, b)| Step::Binary(op, a, b)),
        1 => (-5i64..=5).prop_map(Step::Constant),
    ]
}

/// Recipe: number of inputs and the steps built on top of them.
pub fn arb_recipe(max_steps: usize) -> impl Strategy<Value = (usize, Vec<Step>)> {
    (1usize..=3, prop::collection::vec(arb_step(), 1..=max_steps))
}

/// Build a recipe. Returns every node in creation order; the last is the root.
pub fn build(inputs: usize, steps: &[Step]) -> Vec<Arc<Node>> {
    let mut nodes: Vec<Arc<Node>> =
        (0..inputs).map(|i| Node::input(format!("in{i}"), DType::Float32, &SHAPE)).collect();

    for step in steps {
        let pick = |i: usize| nodes[i % nodes.len()].clone();
        let node = match step {
            Step::Unary(op, a) => Node::unary(*op, pick(*a)),
            Step::Binary(op, a, b) => {
                Node::try_binary(*op, pick(*a), pick(*b)).expect("generated operands share dtype and shape")
            }
            Step::Constant(v) => Node::constant(*v as f64, DType::Float32, &SHAPE),
        };
        nodes.push(node);
    }

    nodes
}

/// Generate a built graph (all nodes, root last).
pub fn arb_graph(max_steps: usize) -> impl Strategy<Value = Vec<Arc<Node>>> {
    arb_recipe(max_steps).prop_map(|(inputs, steps)| build(inputs, &steps))
}
