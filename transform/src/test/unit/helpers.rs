//! Shared graph fixtures.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glimpse_ir::{DType, Distribution, Node, Op, ScanBody, UnaryOp};

use crate::tags::Reason;
use crate::{Hyperparameters, RandomSource, Result, Transform, TransformFn};

pub fn regularize() -> Reason {
    Reason::new("regularize")
}

pub fn input(name: &str) -> Arc<Node> {
    Node::input(name, DType::Float32, &[3])
}

pub fn tanh(src: &Arc<Node>) -> Arc<Node> {
    Node::unary(UnaryOp::Tanh, src.clone())
}

/// Sources of `node`, by position.
pub fn src(node: &Arc<Node>, index: usize) -> Arc<Node> {
    node.op().sources()[index].clone()
}

/// `scan` over `seq` whose single output is `tanh(z)` with `z = exp(param)`.
///
/// Returns `(output, z)`.
pub fn scan_with_inner(seq: &Arc<Node>) -> (Arc<Node>, Arc<Node>) {
    let p = Node::param(0, DType::Float32, &[3]);
    let z = Node::unary(UnaryOp::Exp, p.clone());
    let body = ScanBody::new(vec![p], vec![tanh(&z)]).unwrap();
    let scan = Node::scan(body, vec![seq.clone()]).unwrap();
    (Node::output(&scan, 0).unwrap(), z)
}

/// Body output of the scan behind an OUTPUT node.
pub fn body_output(output: &Arc<Node>) -> Arc<Node> {
    let Op::Output { src: scan, index } = output.op() else {
        panic!("expected OUTPUT, got {:?}", output.op());
    };
    scan.op().nested().unwrap().outputs()[*index].clone()
}

/// Custom transform wrapping its input in a unary op, counting invocations.
#[derive(Debug)]
pub struct Wrap {
    op: UnaryOp,
    calls: Arc<AtomicUsize>,
}

impl std::fmt::Display for Wrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wrap({})", self.op)
    }
}

impl TransformFn for Wrap {
    fn apply(&self, node: &Arc<Node>, _: &Hyperparameters, _: &mut dyn RandomSource) -> Result<Arc<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Node::unary(self.op, node.clone()))
    }
}

pub fn wrap(op: UnaryOp) -> (Arc<Transform>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (Transform::custom(Wrap { op, calls: calls.clone() }), calls)
}

/// Random source that remembers what was sampled.
#[derive(Debug, Default)]
pub struct Recording {
    pub samples: Vec<Distribution>,
}

impl RandomSource for Recording {
    fn sample(&mut self, dist: Distribution, like: &Node, param: Arc<Node>) -> Arc<Node> {
        self.samples.push(dist);
        Node::random(dist, param, like.dtype(), like.shape(), 0)
    }
}
