use arbor_graph::{Graph, NodeIx, alg};

fn graph(n: usize, edges: &[(usize, usize)]) -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::new();
    for _ in 0..n {
        g.add_node(());
    }
    for &(v, w) in edges {
        g.add_edge(NodeIx(v), NodeIx(w), ()).unwrap();
    }
    g
}

fn sorted(mut v: Vec<NodeIx>) -> Vec<NodeIx> {
    v.sort();
    v
}

#[test]
fn alg_ancestors_excludes_the_start_node_in_a_dag() {
    let g = graph(4, &[(0, 1), (1, 2), (0, 2), (3, 2)]);
    assert_eq!(
        sorted(alg::ancestors(&g, NodeIx(2))),
        vec![NodeIx(0), NodeIx(1), NodeIx(3)]
    );
    assert!(alg::ancestors(&g, NodeIx(0)).is_empty());
}

#[test]
fn alg_descendants_follows_out_edges_transitively() {
    let g = graph(4, &[(0, 1), (1, 2), (3, 2)]);
    assert_eq!(
        sorted(alg::descendants(&g, NodeIx(0))),
        vec![NodeIx(1), NodeIx(2)]
    );
    assert!(alg::descendants(&g, NodeIx(2)).is_empty());
}

#[test]
fn alg_ancestors_of_a_cycle_member_contains_itself() {
    let g = graph(3, &[(0, 1), (1, 0), (1, 2)]);
    assert_eq!(sorted(alg::ancestors(&g, NodeIx(0))), vec![NodeIx(0), NodeIx(1)]);
}

#[test]
fn alg_reachable_tolerates_duplicate_neighbors() {
    let next = |v: NodeIx| match v.0 {
        0 => vec![NodeIx(1), NodeIx(1), NodeIx(2)],
        1 => vec![NodeIx(2)],
        _ => vec![],
    };
    assert_eq!(
        sorted(alg::reachable([NodeIx(0)], next)),
        vec![NodeIx(1), NodeIx(2)]
    );
}

#[test]
fn alg_cyclic_nodes_is_empty_for_a_dag() {
    let g = graph(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
    assert!(alg::cyclic_nodes(&g).is_empty());
}

#[test]
fn alg_cyclic_nodes_finds_self_loops() {
    let g = graph(3, &[(0, 0), (0, 1), (2, 1)]);
    assert_eq!(alg::cyclic_nodes(&g), vec![NodeIx(0)]);
}

#[test]
fn alg_cyclic_nodes_finds_every_member_of_a_cycle_but_not_its_tail() {
    // 0 -> 1 -> 2 -> 3 -> 1, 3 -> 4
    let g = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 1), (3, 4)]);
    assert_eq!(
        alg::cyclic_nodes(&g),
        vec![NodeIx(1), NodeIx(2), NodeIx(3)]
    );
}

#[test]
fn alg_cyclic_nodes_handles_two_disjoint_cycles() {
    let g = graph(5, &[(0, 1), (1, 0), (2, 3), (3, 4), (4, 2)]);
    assert_eq!(
        alg::cyclic_nodes(&g),
        vec![NodeIx(0), NodeIx(1), NodeIx(2), NodeIx(3), NodeIx(4)]
    );
}
