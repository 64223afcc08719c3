/// Graph-shape tests for the Graphviz recorder.
/// Drives `GraphBuilder` directly through the `EventRecorder` contract and
/// checks both the in-memory snapshot and the emitted DOT text.

use lifetrace::domain::edge::EdgeStyle;
use lifetrace::domain::graph::GraphSnapshot;
use lifetrace::domain::ids::{Identity, NodeId};
use lifetrace::domain::value::{Provenance, TrackedValue};
use lifetrace::infrastructure::{GraphBuilder, GraphOptions};
use lifetrace::EventRecorder;

/// Minimal tracked value owned by the test.
struct Var {
    identity: Identity,
    name: String,
    value: i64,
}

impl Var {
    fn new(identity: u64, name: &str, value: i64) -> Self {
        Self {
            identity: Identity(identity),
            name: name.to_string(),
            value,
        }
    }
}

impl TrackedValue for Var {
    fn identity(&self) -> Identity {
        self.identity
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn payload(&self) -> i64 {
        self.value
    }
    fn provenance(&self) -> Provenance {
        Provenance::Named
    }
    fn address(&self) -> usize {
        self as *const Self as usize
    }
}

fn builder() -> GraphBuilder<Vec<u8>> {
    GraphBuilder::new(Vec::new(), GraphOptions::default()).unwrap()
}

fn finish(b: GraphBuilder<Vec<u8>>) -> (GraphSnapshot, String) {
    let snapshot = b.snapshot().unwrap();
    let dot = String::from_utf8(b.into_inner().unwrap()).unwrap();
    (snapshot, dot)
}

/// Count node definitions and edge statements in DOT text.
fn count_dot(dot: &str) -> (usize, usize) {
    let mut nodes = 0;
    let mut edges = 0;
    for line in dot.lines().map(str::trim) {
        if line.contains(" -> ") {
            edges += 1;
        } else if line
            .split_once(" [")
            .map(|(id, _)| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
        {
            nodes += 1;
        }
    }
    (nodes, edges)
}

#[test]
fn value_construct_yields_one_value_one_op_one_edge() {
    let mut b = builder();
    let v = Var::new(1, "v", 42);
    b.record_value_construct(&v).unwrap();

    let (snap, dot) = finish(b);
    assert_eq!(snap.value_nodes().count(), 1);
    assert_eq!(snap.operations_labeled("ValueCtor").count(), 1);
    assert_eq!(snap.edges.len(), 1);

    let op = snap.operations_labeled("ValueCtor").next().unwrap().id;
    let value = snap.occurrences_of("v").next().unwrap().id;
    assert!(snap.has_edge(op, value, EdgeStyle::Plain));

    assert_eq!(count_dot(&dot), (2, 1));
    assert!(dot.contains("<tr><td>value</td><td>42</td></tr>"));
}

#[test]
fn copy_construct_links_source_through_op_to_copy() {
    let mut b = builder();
    let a = Var::new(1, "a", 42);
    let c = Var::new(2, "b", 42);
    b.record_value_construct(&a).unwrap();
    b.record_copy_construct(&c, &a).unwrap();

    let (snap, dot) = finish(b);
    assert_eq!(snap.value_nodes().count(), 2);
    assert_eq!(snap.operations_labeled("CopyCtor").count(), 1);

    let op = snap.operations_labeled("CopyCtor").next().unwrap().id;
    let a_node = snap.occurrences_of("a").next().unwrap().id;
    let b_node = snap.occurrences_of("b").next().unwrap().id;
    assert!(snap.has_edge(a_node, op, EdgeStyle::Plain));
    assert!(snap.has_edge(op, b_node, EdgeStyle::Plain));
    assert!(dot.contains("shape = \"diamond\" fillcolor = \"red\""));
}

#[test]
fn two_phase_move_construct() {
    let mut b = builder();
    let mut a = Var::new(1, "a", 42);
    let dst = Var::new(2, "b", 42);
    b.record_value_construct(&a).unwrap();
    let edges_before = b.snapshot().unwrap().edges.len();

    let token = b.record_move_construct_begin(&a).unwrap();
    a.value = 0;
    b.record_move_construct_end(&dst, &a, token).unwrap();

    let (snap, _) = finish(b);
    let a_nodes: Vec<NodeId> = snap.occurrences_of("a").map(|n| n.id).collect();
    let b_nodes: Vec<NodeId> = snap.occurrences_of("b").map(|n| n.id).collect();
    assert_eq!(a_nodes.len(), 2, "pre- and post-move occurrence of a");
    assert_eq!(b_nodes.len(), 1);
    assert_eq!(snap.operations_labeled("MoveCtor").count(), 1);

    let op = snap.operations_labeled("MoveCtor").next().unwrap().id;
    let move_edges: Vec<_> = snap.edges[edges_before..]
        .iter()
        .filter(|e| e.src == op || e.dst == op)
        .collect();
    assert_eq!(move_edges.len(), 3);
    assert!(snap.has_edge(a_nodes[0], op, EdgeStyle::Plain));
    assert!(snap.has_edge(op, b_nodes[0], EdgeStyle::Plain));
    assert!(snap.has_edge(op, a_nodes[1], EdgeStyle::Tapered));

    // Identity continuity of `a` across the move.
    assert!(snap.has_edge(a_nodes[0], a_nodes[1], EdgeStyle::Dotted));
}

#[test]
fn two_phase_move_assign() {
    let mut b = builder();
    let mut src = Var::new(1, "src", 5);
    let mut dst = Var::new(2, "dst", 0);
    b.record_value_construct(&src).unwrap();
    b.record_default_construct(&dst).unwrap();

    let token = b.record_move_assign_begin(&src).unwrap();
    dst.value = src.value;
    src.value = 0;
    b.record_move_assign_end(&dst, &src, token).unwrap();

    let (snap, dot) = finish(b);
    let op = snap.operations_labeled("MoveAssOptor").next().unwrap().id;
    let src_nodes: Vec<NodeId> = snap.occurrences_of("src").map(|n| n.id).collect();
    let dst_nodes: Vec<NodeId> = snap.occurrences_of("dst").map(|n| n.id).collect();

    assert_eq!(snap.edges.iter().filter(|e| e.src == op || e.dst == op).count(), 3);
    assert!(snap.has_edge(src_nodes[0], op, EdgeStyle::Plain));
    assert!(snap.has_edge(op, dst_nodes[1], EdgeStyle::Plain));
    assert!(snap.has_edge(op, src_nodes[1], EdgeStyle::Tapered));
    assert!(snap.has_edge(dst_nodes[0], dst_nodes[1], EdgeStyle::Dotted));
    assert!(dot.contains("shape = \"circle\" fillcolor = \"green\""));
    assert!(dot.contains("[style = \"tapered\"]"));
}

#[test]
fn repeated_copy_assign_chains_destination() {
    let mut b = builder();
    let src = Var::new(1, "src", 3);
    let dst = Var::new(2, "dst", 3);
    b.record_value_construct(&src).unwrap();
    b.record_copy_assign(&dst, &src).unwrap();
    b.record_copy_assign(&dst, &src).unwrap();

    let (snap, _) = finish(b);
    let dst_nodes: Vec<NodeId> = snap.occurrences_of("dst").map(|n| n.id).collect();
    let ops: Vec<NodeId> = snap.operations_labeled("CopyAssOptor").map(|n| n.id).collect();

    assert_eq!(dst_nodes.len(), 2);
    assert_eq!(ops.len(), 2);
    assert_eq!(snap.edges_styled(EdgeStyle::Dotted).count(), 1);
    assert!(snap.has_edge(dst_nodes[0], dst_nodes[1], EdgeStyle::Dotted));
    assert!(snap.has_edge(ops[0], dst_nodes[0], EdgeStyle::Plain));
    assert!(snap.has_edge(ops[1], dst_nodes[1], EdgeStyle::Plain));
    // The source is only observed, never re-occurred.
    assert_eq!(snap.occurrences_of("src").count(), 1);
}

#[test]
fn reassignment_chain_has_n_minus_one_dotted_edges() {
    let mut b = builder();
    let x = Var::new(1, "x", 1);
    let y = Var::new(2, "y", 2);
    b.record_value_construct(&x).unwrap();
    b.record_value_construct(&y).unwrap();
    for _ in 0..4 {
        b.record_binary_assign_op(&x, &y, "+=").unwrap();
    }
    b.record_destruct(&x).unwrap();

    let (snap, _) = finish(b);
    let x_nodes: Vec<NodeId> = snap.occurrences_of("x").map(|n| n.id).collect();
    assert_eq!(x_nodes.len(), 6);
    let dotted: Vec<_> = snap.edges_styled(EdgeStyle::Dotted).collect();
    assert_eq!(dotted.len(), 5);
    for (edge, pair) in dotted.iter().zip(x_nodes.windows(2)) {
        assert_eq!((edge.src, edge.dst), (pair[0], pair[1]));
    }
}

#[test]
fn operators_link_operands_and_result() {
    let mut b = builder();
    let l = Var::new(1, "l", 6);
    let r = Var::new(2, "r", 7);
    let sum = Var::new(3, "sum", 13);
    let neg = Var::new(4, "neg", -6);
    b.record_value_construct(&l).unwrap();
    b.record_value_construct(&r).unwrap();
    b.record_binary_op(&sum, &l, &r, "+").unwrap();
    b.record_unary_op(&neg, &l, "-").unwrap();

    let (snap, dot) = finish(b);
    let l_node = snap.occurrences_of("l").next().unwrap().id;
    let r_node = snap.occurrences_of("r").next().unwrap().id;
    let sum_node = snap.occurrences_of("sum").next().unwrap().id;
    let neg_node = snap.occurrences_of("neg").next().unwrap().id;
    let plus = snap.operations_labeled("+").next().unwrap().id;
    let minus = snap.operations_labeled("-").next().unwrap().id;

    assert!(snap.has_edge(l_node, plus, EdgeStyle::Plain));
    assert!(snap.has_edge(r_node, plus, EdgeStyle::Plain));
    assert!(snap.has_edge(plus, sum_node, EdgeStyle::Plain));
    assert!(snap.has_edge(l_node, minus, EdgeStyle::Plain));
    assert!(snap.has_edge(minus, neg_node, EdgeStyle::Plain));
    assert_eq!(snap.occurrences_of("l").count(), 1);
    assert!(dot.contains("label = \"+\" shape = \"circle\" fillcolor = \"white\""));
}

#[test]
fn node_ids_strictly_increase_and_are_all_rendered() {
    let mut b = builder();
    let a = Var::new(1, "a", 1);
    let c = Var::new(2, "c", 1);
    b.record_value_construct(&a).unwrap();
    b.record_copy_construct(&c, &a).unwrap();
    b.record_copy_assign(&a, &c).unwrap();
    b.record_destruct(&c).unwrap();
    b.record_destruct(&a).unwrap();
    let issued = b.nodes_issued();

    let (snap, dot) = finish(b);
    let ids: Vec<u64> = snap.nodes.iter().map(|n| n.id.0).collect();
    assert_eq!(ids, (0..issued).collect::<Vec<_>>());
    assert_eq!(count_dot(&dot).0 as u64, issued);
}

#[test]
fn function_groupings_nest_lifo() {
    let mut b = builder();
    b.record_function_entry("outer").unwrap();
    b.record_value_construct(&Var::new(1, "o", 1)).unwrap();
    b.record_function_entry("first").unwrap();
    b.record_value_construct(&Var::new(2, "f", 1)).unwrap();
    b.record_function_exit().unwrap();
    b.record_function_entry("second").unwrap();
    assert_eq!(b.depth(), 2);
    b.record_function_exit().unwrap();
    b.record_function_exit().unwrap();
    assert_eq!(b.depth(), 0);

    let (snap, dot) = finish(b);
    assert_eq!(snap.groupings, 3);
    assert_eq!(snap.occurrences_of("o").next().unwrap().depth, 1);
    assert_eq!(snap.occurrences_of("f").next().unwrap().depth, 2);

    // Replay the text as a stack of open blocks.
    let mut stack: Vec<String> = Vec::new();
    let mut closed: Vec<String> = Vec::new();
    let mut pending_label = false;
    for line in dot.lines().map(str::trim) {
        if line.starts_with("digraph") {
            stack.push("digraph".to_string());
        } else if line.starts_with("subgraph cluster_") {
            stack.push(String::new());
            pending_label = true;
        } else if pending_label && line.starts_with("label = ") {
            *stack.last_mut().unwrap() = line.trim_start_matches("label = ").trim_matches('"').to_string();
            pending_label = false;
        } else if line == "}" {
            closed.push(stack.pop().expect("unbalanced close"));
        }
    }
    assert!(stack.is_empty());
    assert_eq!(closed, vec!["first", "second", "outer", "digraph"]);
}

#[test]
fn edges_follow_every_node_definition() {
    let mut b = builder();
    let a = Var::new(1, "a", 1);
    b.record_function_entry("main").unwrap();
    b.record_value_construct(&a).unwrap();
    b.record_function_exit().unwrap();
    b.record_destruct(&a).unwrap();

    let (_, dot) = finish(b);
    let lines: Vec<&str> = dot.lines().map(str::trim).collect();
    let first_edge = lines.iter().position(|l| l.contains(" -> ")).unwrap();
    let last_node = lines
        .iter()
        .rposition(|l| l.contains(" [") && !l.contains(" -> "))
        .unwrap();
    assert!(last_node < first_edge);
    assert_eq!(lines.last(), Some(&"}"));
}
