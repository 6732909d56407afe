//! ASCII rendering of node graphs.
//!
//! Scan nodes are drawn with their sequences followed by a `body` subtree that
//! lists the parameter slots before the per-step outputs. A node reached a
//! second time, including a captured outer node seen again inside a body, is
//! drawn as `[id] → (see above)`.

use std::collections::HashSet;
use std::sync::Arc;

use ptree::TreeBuilder;
use ptree::item::StringItem;

use crate::{Node, Op};

/// Format a single node for display.
///
/// Output format: `[id] OP : dtype shape=[...]`
pub fn format_node(node: &Arc<Node>) -> String {
    let op_str = match node.op() {
        Op::Input { name } => format!("INPUT('{}')", name),
        Op::Param { index } => format!("PARAM({})", index),
        Op::Const(value) => format!("CONST({})", value),
        Op::Unary(op, _) => op.to_string(),
        Op::Binary(op, ..) => op.to_string(),
        Op::Random { dist, seed, .. } => format!("RANDOM({}, seed={})", dist, seed),
        Op::Scan { body, .. } => format!("SCAN(outputs={})", body.outputs().len()),
        Op::Output { index, .. } => format!("OUTPUT({})", index),
    };

    format!("[{}] {} : {} shape={:?}", node.id, op_str, node.dtype(), node.shape().as_slice())
}

/// Build the display tree rooted at `node`.
pub fn build_tree(node: &Arc<Node>) -> StringItem {
    let mut visited = HashSet::from([node.id]);
    let mut builder = TreeBuilder::new(format_node(node));
    add_children(&mut builder, node, &mut visited);
    builder.build()
}

/// Render `node` and everything it depends on as an ASCII tree.
pub fn render_tree(node: &Arc<Node>) -> String {
    let mut buf = Vec::new();
    ptree::write_tree(&build_tree(node), &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

fn add_node(builder: &mut TreeBuilder, node: &Arc<Node>, visited: &mut HashSet<u64>) {
    if !visited.insert(node.id) {
        builder.add_empty_child(format!("[{}] → (see above)", node.id));
        return;
    }

    builder.begin_child(format_node(node));
    add_children(builder, node, visited);
    builder.end_child();
}

fn add_children(builder: &mut TreeBuilder, node: &Arc<Node>, visited: &mut HashSet<u64>) {
    let Op::Scan { body, sequences } = node.op() else {
        for src in node.op().sources() {
            add_node(builder, &src, visited);
        }
        return;
    };

    for seq in sequences {
        add_node(builder, seq, visited);
    }

    builder.begin_child("body".to_string());
    for param in body.params() {
        add_node(builder, param, visited);
    }
    for (index, output) in body.outputs().iter().enumerate() {
        builder.begin_child(format!("step output {index}"));
        add_node(builder, output, visited);
        builder.end_child();
    }
    builder.end_child();
}
