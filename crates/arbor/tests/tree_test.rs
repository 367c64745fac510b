use arbor::builder::build;
use arbor::{Definition, Diagnostic, GridSize, LayoutNode, LayoutOptions, Tree, pipeline};

#[test]
fn tree_layer_ordered_sorts_by_row_then_index() {
    let mut tree = Tree::new();
    let a = tree.graph_mut().add_node(LayoutNode::routing(1, 3.0));
    let b = tree.graph_mut().add_node(LayoutNode::routing(1, 1.0));
    let c = tree.graph_mut().add_node(LayoutNode::routing(1, 3.0));
    tree.index_layers();

    assert_eq!(tree.layer(1), vec![a, b, c]);
    assert_eq!(tree.layer_ordered(1), vec![b, a, c]);
    assert_eq!(tree.node_at(1, 1), Some(b));
    assert_eq!(tree.node_at(1, 2), None);
    assert_eq!(tree.row(3), vec![a, c]);
}

#[test]
fn tree_swap_rows_refuses_nodes_on_different_layers() {
    let mut tree = Tree::new();
    let a = tree.graph_mut().add_node(LayoutNode::routing(1, 1.0));
    let b = tree.graph_mut().add_node(LayoutNode::routing(2, 2.0));
    let c = tree.graph_mut().add_node(LayoutNode::routing(1, 2.0));
    tree.index_layers();

    assert!(!tree.swap_rows(a, b));
    assert_eq!(tree.y(a), 1);
    assert!(tree.swap_rows(a, c));
    assert_eq!(tree.y(a), 2);
    assert_eq!(tree.y(c), 1);
}

#[test]
fn tree_diagnostics_report_shared_cells_and_out_of_bounds_nodes() {
    let mut tree = Tree::new();
    let a = tree.graph_mut().add_node(LayoutNode::routing(1, 1.0));
    let b = tree.graph_mut().add_node(LayoutNode::routing(1, 1.0));
    let c = tree.graph_mut().add_node(LayoutNode::routing(0, 2.0));
    tree.index_layers();

    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.contains(&Diagnostic::OutOfBounds { node: c, x: 0, y: 2 }));
    assert!(diagnostics.contains(&Diagnostic::DuplicatePosition {
        x: 1,
        y: 1,
        nodes: vec![a, b],
    }));
}

#[test]
fn tree_reset_discards_everything() {
    let mut tree = pipeline::run(
        &[
            Definition::new("a", 1),
            Definition::new("b", 2).with_prerequisites(["a"]),
        ],
        &LayoutOptions::default(),
    )
    .unwrap();
    assert_eq!(tree.size(), GridSize { layers: 2, rows: 1 });

    tree.reset();
    assert!(tree.is_empty());
    assert_eq!(tree.edge_count(), 0);
    assert!(tree.tech_levels().is_empty());
    assert!(tree.tech_level_bounds().is_empty());
    assert_eq!(tree.size(), GridSize::default());
}

#[test]
fn tree_display_dumps_layers_with_neighbours() {
    let tree = pipeline::run(
        &[
            Definition::new("a", 1),
            Definition::new("b", 1).with_prerequisites(["a"]),
        ],
        &LayoutOptions::default(),
    )
    .unwrap();
    let dump = tree.to_string();

    assert!(dump.starts_with("Layer 1:\n\ta (1, 1)\n"), "{dump}");
    assert!(dump.contains("Layer 2:\n\tb (2, 1)\n\t\tAbove: a\n\t\tBelow: \n"), "{dump}");
}

#[test]
fn tree_counts_content_and_routing_nodes() {
    let mut tree = build(&[
        Definition::new("a", 1),
        Definition::new("b", 1).with_prerequisites(["a"]),
    ]);
    assert_eq!(tree.content_count(), 2);
    assert_eq!(tree.routing_count(), 0);
    tree.graph_mut().add_node(LayoutNode::routing(1, 1.0));
    assert_eq!(tree.routing_count(), 1);
    assert_eq!(tree.node_count(), 3);
}
