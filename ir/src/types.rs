//! Type definitions for graph operations.
//!
//! Element types, literal values, operation kinds and sampling distributions.

/// Element type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DType {
    Bool,
    Int64,
    Float32,
    Float64,
    /// Multi-output producers (SCAN) carry no value of their own.
    Void,
}

impl DType {
    pub const fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

/// Literal value stored in a CONST node.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ConstValue {
    /// Natural dtype for the literal.
    pub const fn dtype(&self) -> DType {
        match self {
            ConstValue::Int(_) => DType::Int64,
            ConstValue::Float(_) => DType::Float32,
            ConstValue::Bool(_) => DType::Bool,
        }
    }
}

impl From<f64> for ConstValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for ConstValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ConstValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Elementwise unary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UnaryOp {
    Neg,
    Exp,
    Log,
    Tanh,
    Sigmoid,
    Relu,
}

/// Elementwise binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Max,
}

/// Distribution sampled by a RANDOM node.
///
/// The distribution parameter lives in the graph as the node's `param` source so
/// it may be a literal or a symbolic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Distribution {
    /// 1 with probability `param` (the keep probability), else 0.
    Bernoulli,
    /// Zero-mean Gaussian with standard deviation `param`.
    Normal,
}
