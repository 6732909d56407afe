use glimpse_ir::DType;
use snafu::Snafu;

use crate::tags::Reason;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Transform registered on a leaf that is not a literal.
    ///
    /// Extraction clones the node, so the caller would lose its only handle to it.
    #[snafu(display(
        "cannot tag graph input {node_id} for {reason}: it would be cloned on extraction \
         and the caller's reference lost; tag an operation output instead"
    ))]
    TransformOnGraphInput { node_id: u64, reason: Reason },

    /// Transform registered on a SCAN producer rather than one of its outputs.
    #[snafu(display(
        "cannot tag node {node_id} for {reason}: it carries a nested graph and has no value of its own; \
         tag one of its OUTPUT nodes instead"
    ))]
    TransformOnMultiOutput { node_id: u64, reason: Reason },

    /// Transform that builds arithmetic applied to a non-float node.
    #[snafu(display("{transform} needs a float operand, node {node_id} is {dtype}"))]
    NonFloatOperand { transform: &'static str, node_id: u64, dtype: DType },

    /// Hyperparameter key read by a transform is absent from the bag.
    #[snafu(display("hyperparameter '{key}' is not set"))]
    MissingHyperparameter { key: String },

    /// Graph error while building a replacement.
    #[snafu(context(false), display("graph error: {source}"))]
    Ir { source: glimpse_ir::Error },
}
