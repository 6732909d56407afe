//! Static shapes and elementwise shape rules.
//!
//! Shapes are fully concrete. Binary operations require equal shapes, except that
//! a rank-0 operand broadcasts against anything.

use smallvec::SmallVec;

/// Shape type - sequence of concrete dimensions, inline up to rank 4.
pub type Shape = SmallVec<[usize; 4]>;

/// Shape of an elementwise binary result, or `None` if the operands disagree.
pub fn broadcast_binary(lhs: &Shape, rhs: &Shape) -> Option<Shape> {
    if lhs == rhs {
        return Some(lhs.clone());
    }
    if lhs.is_empty() {
        return Some(rhs.clone());
    }
    if rhs.is_empty() {
        return Some(lhs.clone());
    }
    None
}

/// Stack `steps` copies of `element` along a new leading axis.
pub fn stacked(steps: usize, element: &Shape) -> Shape {
    let mut shape = Shape::with_capacity(element.len() + 1);
    shape.push(steps);
    shape.extend_from_slice(element);
    shape
}
