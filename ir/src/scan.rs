//! Nested graphs carried by SCAN operations.
//!
//! A [`ScanBody`] is a self-contained graph: PARAM leaves stand in for one step's
//! slice of each sequence, and the outputs are evaluated once per step. Outputs
//! may also capture nodes of the enclosing graph directly.

use std::sync::Arc;

use snafu::ensure;

use crate::error::{Result, ScanParamNotLeafSnafu};
use crate::node::Node;
use crate::op::Op;

#[derive(Debug)]
pub struct ScanBody {
    pub(crate) params: Vec<Arc<Node>>,
    pub(crate) outputs: Vec<Arc<Node>>,
}

impl ScanBody {
    /// Create a body from its parameter leaves and per-step outputs.
    ///
    /// `params[i]` must be a `PARAM` leaf with index `i`.
    pub fn new(params: Vec<Arc<Node>>, outputs: Vec<Arc<Node>>) -> Result<Arc<Self>> {
        for (index, param) in params.iter().enumerate() {
            let is_slot = matches!(param.op(), Op::Param { index: i } if *i == index);
            ensure!(is_slot, ScanParamNotLeafSnafu { index, id: param.id });
        }
        Ok(Arc::new(Self { params, outputs }))
    }

    pub fn params(&self) -> &[Arc<Node>] {
        &self.params
    }

    pub fn outputs(&self) -> &[Arc<Node>] {
        &self.outputs
    }

    /// Same parameters, replaced outputs.
    pub fn with_outputs(&self, outputs: Vec<Arc<Node>>) -> Arc<Self> {
        Arc::new(Self { params: self.params.clone(), outputs })
    }
}
