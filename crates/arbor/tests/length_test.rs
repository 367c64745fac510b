use arbor::graph::NodeIx;
use arbor::length::{
    global_layer, layer_edge_length, local_layer, minimize_edge_length, total_edge_length,
};
use arbor::order::total_crossings;
use arbor::pipeline::{Step, run_step};
use arbor::{Definition, LayoutEdge, LayoutNode, LayoutOptions, Tree};

const EPSILON: f64 = 1e-4;

fn grid(nodes: &[(i32, i32)], links: &[(usize, usize)]) -> (Tree, Vec<NodeIx>) {
    let mut tree = Tree::new();
    let vs: Vec<NodeIx> = nodes
        .iter()
        .map(|&(x, y)| {
            tree.graph_mut()
                .add_node(LayoutNode::routing(x, f64::from(y)))
        })
        .collect();
    for &(a, b) in links {
        let label = LayoutEdge {
            source: vs[a],
            target: vs[b],
        };
        tree.graph_mut().add_edge(vs[a], vs[b], label);
    }
    tree.index_layers();
    (tree, vs)
}

fn fan(count: usize) -> Vec<Definition> {
    let mut defs = vec![Definition::new("root", 1)];
    for i in 0..count {
        defs.push(Definition::new(format!("leaf{i}"), 1).with_prerequisites(["root"]));
        defs.push(
            Definition::new(format!("next{i}"), 2)
                .with_prerequisites([format!("leaf{i}"), format!("leaf{}", (i + 1) % count)]),
        );
    }
    defs
}

#[test]
fn edge_length_scales_row_distance_by_span() {
    let (tree, _) = grid(&[(1, 1), (2, 4), (4, 2)], &[(0, 1), (0, 2)]);
    assert_eq!(total_edge_length(&tree), 3.0 + 3.0);
    assert_eq!(layer_edge_length(&tree, 2), 3.0);
    assert_eq!(layer_edge_length(&tree, 1), 6.0);
}

#[test]
fn local_layer_moves_a_node_into_an_empty_row_next_to_its_neighbour() {
    let (mut tree, vs) = grid(&[(1, 1), (2, 3)], &[(0, 1)]);
    local_layer(&mut tree, 2, true, EPSILON);
    assert_eq!(tree.y(vs[1]), 1);
    assert_eq!(total_edge_length(&tree), 0.0);
}

#[test]
fn local_layer_refuses_moves_that_add_crossings() {
    // Swapping b0 and b1 would shorten the a0 -> b1 bundle but cross a1 -> b1 with a0 -> b0.
    let (mut tree, vs) = grid(
        &[(1, 1), (1, 2), (2, 1), (2, 2)],
        &[(0, 2), (1, 3), (0, 3), (0, 3), (0, 3)],
    );
    assert_eq!(total_crossings(&tree), 0);
    local_layer(&mut tree, 2, true, EPSILON);
    assert_eq!(tree.y(vs[2]), 1);
    assert_eq!(tree.y(vs[3]), 2);
    assert_eq!(total_crossings(&tree), 0);
}

#[test]
fn global_layer_pulls_a_node_between_its_neighbours() {
    let (mut tree, vs) = grid(&[(1, 1), (2, 5), (3, 1)], &[(0, 1), (1, 2)]);
    global_layer(&mut tree, 2, EPSILON);
    assert_eq!(tree.y(vs[1]), 1);
    assert_eq!(total_edge_length(&tree), 0.0);
}

#[test]
fn minimize_edge_length_shortens_without_adding_crossings() {
    let defs = fan(12);
    let opts = LayoutOptions::default();
    let mut tree = Tree::new();
    for step in &Step::ALL[..7] {
        run_step(&mut tree, *step, &defs, &opts).unwrap();
    }
    let length = total_edge_length(&tree);
    let crossings = total_crossings(&tree);

    let report = minimize_edge_length(&mut tree, &opts).unwrap();
    assert_eq!(report.before, length);
    assert!(report.after <= length + EPSILON);
    assert!(report.crossings <= crossings);
    assert_eq!(total_crossings(&tree), report.crossings);
    assert!(report.local.sweeps <= opts.max_sweeps);
    assert!(report.global.sweeps <= opts.max_sweeps);
}

#[test]
fn minimize_edge_length_requires_a_normalized_tree() {
    let (mut tree, _) = grid(&[(1, 1), (3, 1)], &[(0, 1)]);
    assert!(minimize_edge_length(&mut tree, &LayoutOptions::default()).is_err());
}
