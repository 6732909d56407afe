use snafu::Snafu;

use crate::shape::Shape;
use crate::types::{BinaryOp, DType};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// DType mismatch in binary operation.
    #[snafu(display("dtype mismatch in {op}: cannot combine {lhs} and {rhs}"))]
    DTypeMismatch { op: BinaryOp, lhs: DType, rhs: DType },

    /// Shapes neither match nor broadcast from a scalar.
    #[snafu(display("shape mismatch in {op}: {lhs:?} vs {rhs:?}"))]
    ShapeMismatch { op: BinaryOp, lhs: Box<Shape>, rhs: Box<Shape> },

    /// Rebuilding an operation with the wrong number of sources.
    #[snafu(display("{op} expects {expected} sources, got {actual}"))]
    ArityMismatch { op: &'static str, expected: usize, actual: usize },

    /// OUTPUT index past the producer's output count.
    #[snafu(display("output index {index} out of bounds for producer with {count} outputs"))]
    OutputIndexOutOfBounds { index: usize, count: usize },

    /// OUTPUT applied to a single-output node.
    #[snafu(display("node {id} ({op}) does not produce multiple outputs"))]
    NotMultiOutput { id: u64, op: &'static str },

    /// Nested-graph rebuild requested on a plain operation.
    #[snafu(display("node {id} ({op}) carries no nested graph"))]
    NoNestedGraph { id: u64, op: &'static str },

    /// Scan body parameters do not line up with the sequences feeding them.
    #[snafu(display("scan body expects {params} parameters, got {sequences} sequences"))]
    ScanParamMismatch { params: usize, sequences: usize },

    /// A scan body parameter slot holds something other than a PARAM leaf.
    #[snafu(display("scan body parameter {index} is not a PARAM leaf (node {id})"))]
    ScanParamNotLeaf { index: usize, id: u64 },

    /// Scan sequence element shape does not match its parameter.
    #[snafu(display("scan sequence {index} has element shape {sequence:?}, parameter expects {param:?}"))]
    ScanSequenceShape { index: usize, sequence: Box<Shape>, param: Box<Shape> },

    /// Scan needs at least one sequence to fix the step count.
    #[snafu(display("scan requires at least one sequence"))]
    ScanWithoutSequences,
}

/// Log an error together with the provenance lineage of the node it concerns.
pub fn log_provenance(node_id: u64, error: &Error) {
    use crate::provenance::PROVENANCE_TRACKER;

    let lineage = PROVENANCE_TRACKER.with(|tracker| tracker.borrow().lineage(node_id));
    if lineage.is_empty() {
        return;
    }

    let provenance_chain: String =
        lineage.iter().enumerate().map(|(i, event)| format!("\n  [{i}] {event}")).collect();
    tracing::error!(node.id = node_id, error = %error, %provenance_chain, "node error with provenance");
}
