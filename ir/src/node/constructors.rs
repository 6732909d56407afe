//! Node constructors by semantic category.
//!
//! Infallible constructors return `Arc<Node>`; constructors that validate their
//! operands return [`Result`].

use std::sync::Arc;

use smallvec::SmallVec;
use snafu::{OptionExt, ensure};

use crate::error::*;
use crate::node::Node;
use crate::op::Op;
use crate::scan::ScanBody;
use crate::shape::{Shape, broadcast_binary, stacked};
use crate::types::{BinaryOp, ConstValue, DType, Distribution, UnaryOp};

// =========================================================================
// Leaves
// =========================================================================

impl Node {
    /// Outer graph input.
    #[track_caller]
    pub fn input(name: impl Into<String>, dtype: DType, shape: &[usize]) -> Arc<Self> {
        Self::new(Op::Input { name: name.into() }, dtype, Shape::from_slice(shape))
    }

    /// Scan body parameter bound to sequence `index`.
    #[track_caller]
    pub fn param(index: usize, dtype: DType, shape: &[usize]) -> Arc<Self> {
        Self::new(Op::Param { index }, dtype, Shape::from_slice(shape))
    }

    /// Literal broadcast to `shape`.
    #[track_caller]
    pub fn constant(value: impl Into<ConstValue>, dtype: DType, shape: &[usize]) -> Arc<Self> {
        Self::new(Op::Const(value.into()), dtype, Shape::from_slice(shape))
    }

    /// Rank-0 Float32 literal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use glimpse_ir::{DType, Node};
    /// let half = Node::scalar(0.5);
    /// assert_eq!(half.dtype(), DType::Float32);
    /// assert!(half.shape().is_empty());
    /// ```
    #[track_caller]
    pub fn scalar(value: f64) -> Arc<Self> {
        Self::constant(value, DType::Float32, &[])
    }
}

// =========================================================================
// Elementwise
// =========================================================================

impl Node {
    #[track_caller]
    pub fn unary(op: UnaryOp, src: Arc<Self>) -> Arc<Self> {
        let (dtype, shape) = (src.dtype, src.shape.clone());
        Self::new(Op::Unary(op, src), dtype, shape)
    }

    /// Elementwise binary operation.
    ///
    /// # Errors
    /// - `DTypeMismatch` if the operands' dtypes differ
    /// - `ShapeMismatch` if the shapes differ and neither operand is rank-0
    #[track_caller]
    pub fn try_binary(op: BinaryOp, lhs: Arc<Self>, rhs: Arc<Self>) -> Result<Arc<Self>> {
        ensure!(lhs.dtype == rhs.dtype, DTypeMismatchSnafu { op, lhs: lhs.dtype, rhs: rhs.dtype });

        let shape = broadcast_binary(&lhs.shape, &rhs.shape).context(ShapeMismatchSnafu {
            op,
            lhs: Box::new(lhs.shape.clone()),
            rhs: Box::new(rhs.shape.clone()),
        })?;

        let dtype = lhs.dtype;
        Ok(Self::new(Op::Binary(op, lhs, rhs), dtype, shape))
    }

    #[track_caller]
    pub fn try_add(lhs: Arc<Self>, rhs: Arc<Self>) -> Result<Arc<Self>> {
        Self::try_binary(BinaryOp::Add, lhs, rhs)
    }

    #[track_caller]
    pub fn try_sub(lhs: Arc<Self>, rhs: Arc<Self>) -> Result<Arc<Self>> {
        Self::try_binary(BinaryOp::Sub, lhs, rhs)
    }

    #[track_caller]
    pub fn try_mul(lhs: Arc<Self>, rhs: Arc<Self>) -> Result<Arc<Self>> {
        Self::try_binary(BinaryOp::Mul, lhs, rhs)
    }

    #[track_caller]
    pub fn try_div(lhs: Arc<Self>, rhs: Arc<Self>) -> Result<Arc<Self>> {
        Self::try_binary(BinaryOp::Div, lhs, rhs)
    }
}

// =========================================================================
// Random
// =========================================================================

impl Node {
    /// Sample of `dist` with parameter `param`, of the given dtype and shape.
    ///
    /// `seed` fixes the sample: two RANDOM nodes with equal seeds and
    /// parameters denote the same draw.
    #[track_caller]
    pub fn random(dist: Distribution, param: Arc<Self>, dtype: DType, shape: &[usize], seed: u64) -> Arc<Self> {
        Self::new(Op::Random { dist, param, seed }, dtype, Shape::from_slice(shape))
    }
}

// =========================================================================
// Graph-bearing
// =========================================================================

impl Node {
    /// Iterate `body` over the leading axis of `sequences`.
    ///
    /// Every sequence must have the same leading dimension (the step count) and
    /// an element shape equal to its parameter's shape.
    ///
    /// # Errors
    /// - `ScanWithoutSequences` if `sequences` is empty
    /// - `ScanParamMismatch` if parameter and sequence counts differ
    /// - `ScanSequenceShape` if a sequence does not fit its parameter
    #[track_caller]
    pub fn scan(body: Arc<ScanBody>, sequences: Vec<Arc<Self>>) -> Result<Arc<Self>> {
        ensure!(!sequences.is_empty(), ScanWithoutSequencesSnafu);
        ensure!(
            body.params.len() == sequences.len(),
            ScanParamMismatchSnafu { params: body.params.len(), sequences: sequences.len() }
        );

        let steps = sequences[0].shape.first().copied();
        for (index, (sequence, param)) in sequences.iter().zip(&body.params).enumerate() {
            let fits = match sequence.shape.split_first() {
                Some((lead, element)) => Some(*lead) == steps && element == param.shape.as_slice(),
                None => false,
            };
            ensure!(
                fits,
                ScanSequenceShapeSnafu {
                    index,
                    sequence: Box::new(sequence.shape.clone()),
                    param: Box::new(param.shape.clone()),
                }
            );
        }

        let shape = Shape::from_slice(&[steps.unwrap_or_default()]);
        let sequences: SmallVec<[Arc<Self>; 4]> = sequences.into_iter().collect();
        Ok(Self::new(Op::Scan { body, sequences }, DType::Void, shape))
    }

    /// Output `index` of a multi-output producer.
    ///
    /// The output stacks body output `index` across steps.
    ///
    /// # Errors
    /// - `NotMultiOutput` if `src` is not a SCAN
    /// - `OutputIndexOutOfBounds` if `index` exceeds the body's outputs
    #[track_caller]
    pub fn output(src: &Arc<Self>, index: usize) -> Result<Arc<Self>> {
        let Op::Scan { body, .. } = &src.op else {
            return NotMultiOutputSnafu { id: src.id, op: src.op.name() }.fail();
        };
        let inner = body
            .outputs
            .get(index)
            .context(OutputIndexOutOfBoundsSnafu { index, count: body.outputs.len() })?;

        let steps = src.shape.first().copied().unwrap_or_default();
        let (dtype, shape) = (inner.dtype, stacked(steps, &inner.shape));
        Ok(Self::new(Op::Output { src: src.clone(), index }, dtype, shape))
    }

    /// All outputs of a multi-output producer, in order.
    #[track_caller]
    pub fn outputs(src: &Arc<Self>) -> Result<Vec<Arc<Self>>> {
        let count = match src.op.nested() {
            Some(body) => body.outputs.len(),
            None => return NotMultiOutputSnafu { id: src.id, op: src.op.name() }.fail(),
        };
        (0..count).map(|index| Self::output(src, index)).collect()
    }
}
