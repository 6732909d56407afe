use std::sync::Arc;

use glimpse_ir::Node;
use glimpse_ir::node::tree::format_node;

/// Replace the node with a fixed one, disconnecting everything above it.
#[derive(Debug, Clone)]
pub struct ConstantReplace {
    replacement: Arc<Node>,
}

impl ConstantReplace {
    pub fn new(replacement: Arc<Node>) -> Self {
        Self { replacement }
    }

    pub fn replacement(&self) -> &Arc<Node> {
        &self.replacement
    }

    pub(crate) fn apply(&self) -> Arc<Node> {
        self.replacement.clone()
    }
}

impl std::fmt::Display for ConstantReplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "constant({})", format_node(&self.replacement))
    }
}
