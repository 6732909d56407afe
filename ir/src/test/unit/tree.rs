use crate::{DType, Distribution, Node, ScanBody, UnaryOp};

#[test]
fn test_tree_simple() {
    let x = Node::input("x", DType::Float32, &[2, 3]);
    let sum = Node::try_add(x, Node::scalar(1.0)).unwrap();

    let tree = sum.tree();
    println!("Tree output:\n{tree}");
    assert!(tree.lines().next().unwrap().contains("ADD"));
    assert!(tree.contains("INPUT('x') : Float32 shape=[2, 3]"));
    assert!(tree.contains("CONST(1)"));
}

#[test]
fn test_tree_shared_nodes() {
    let x = Node::input("x", DType::Float32, &[3]);
    let shared = Node::try_mul(x.clone(), x.clone()).unwrap();

    let tree = shared.tree();
    assert_eq!(tree.matches("INPUT('x')").count(), 1);
    assert!(tree.contains(&format!("[{}] → (see above)", x.id)));
}

#[test]
fn test_tree_random() {
    let x = Node::input("x", DType::Float32, &[3]);
    let noise = Node::random(Distribution::Normal, Node::scalar(0.1), DType::Float32, &[3], 7);
    let y = Node::try_add(x, noise).unwrap();

    assert!(y.tree().contains("RANDOM(normal, seed=7)"));
}

#[test]
fn test_tree_labels_scan_body() {
    let seq = Node::input("seq", DType::Float32, &[4, 3]);
    let w = Node::input("w", DType::Float32, &[3]);
    let p = Node::param(0, DType::Float32, &[3]);
    let inner = Node::try_mul(Node::unary(UnaryOp::Relu, p.clone()), w.clone()).unwrap();
    let body = ScanBody::new(vec![p.clone()], vec![inner]).unwrap();
    let scan = Node::scan(body, vec![seq]).unwrap();
    let out = Node::output(&scan, 0).unwrap();
    let root = Node::try_add(Node::unary(UnaryOp::Exp, out), Node::unary(UnaryOp::Neg, w.clone())).unwrap();

    let tree = root.tree();
    println!("Scan tree:\n{tree}");
    let position = |needle: &str| tree.find(needle).unwrap_or_else(|| panic!("missing {needle} in\n{tree}"));

    // Sequences, then the body: parameter slots before step outputs
    assert!(position("INPUT('seq')") < position("body"));
    assert!(position("body") < position("PARAM(0)"));
    assert!(position("PARAM(0)") < position("step output 0"));
    assert!(position("step output 0") < position("RELU"));

    // The parameter is listed once, the body output refers back to it
    assert_eq!(tree.matches("PARAM(0)").count(), 1);
    assert!(tree.contains(&format!("[{}] → (see above)", p.id)));

    // The captured outer node is drawn inside the body first, then referenced
    assert_eq!(tree.matches("INPUT('w')").count(), 1);
    assert!(position("INPUT('w')") > position("body"));
    assert!(tree.contains(&format!("[{}] → (see above)", w.id)));
}
