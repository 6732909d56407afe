//! Common imports for working with graphs.
//!
//! ```rust,ignore
//! use glimpse_ir::prelude::*;
//! ```

pub use crate::Op;
pub use crate::node::{Node, NodeKey};
pub use crate::rewrite::{Rewriter, substitute};
pub use crate::scan::ScanBody;
pub use crate::shape::Shape;
pub use crate::types::{BinaryOp, ConstValue, DType, Distribution, UnaryOp};
