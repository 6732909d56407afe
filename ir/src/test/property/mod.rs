//! Property-based tests for graph construction and substitution.
//!
//! Uses proptest to verify invariants across randomly shaped DAGs.

pub mod generators;

mod substitute_props;
