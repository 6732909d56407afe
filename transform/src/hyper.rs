//! Hyperparameter bag shared by every transform of a pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use glimpse_ir::{DType, Node};
use snafu::OptionExt;

use crate::error::{MissingHyperparameterSnafu, Result};

/// Numeric or symbolic hyperparameter value.
#[derive(Debug, Clone, derive_more::From)]
pub enum Hyperparameter {
    Scalar(f64),
    Node(Arc<Node>),
}

impl Hyperparameter {
    /// A literal `<= 0` turns dropout and noise off. Symbolic values never do.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Scalar(v) if *v <= 0.0)
    }

    /// The value as a graph node; literals become rank-0 constants of `dtype`,
    /// which must be a float type.
    pub fn to_node(&self, dtype: DType) -> Arc<Node> {
        match self {
            Self::Scalar(v) => Node::constant(*v, dtype, &[]),
            Self::Node(node) => node.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Hyperparameters {
    values: BTreeMap<String, Hyperparameter>,
}

impl Hyperparameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace `key`, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Hyperparameter>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Hyperparameter>) -> Option<Hyperparameter> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Hyperparameter> {
        self.values.get(key)
    }

    pub(crate) fn require(&self, key: &str) -> Result<&Hyperparameter> {
        self.get(key).context(MissingHyperparameterSnafu { key })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Hyperparameter)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
