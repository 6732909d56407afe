//! Property-based tests for rewrite passes over generated graphs.

pub mod generators;
