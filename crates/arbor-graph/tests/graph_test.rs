use arbor_graph::{EdgeIx, Graph, NodeIx};

fn path_graph(keys: &[&str]) -> Graph<u32, ()> {
    let mut g: Graph<u32, ()> = Graph::new();
    let mut prev: Option<NodeIx> = None;
    for (i, key) in keys.iter().enumerate() {
        let ix = g.add_keyed_node(*key, i as u32);
        if let Some(p) = prev {
            g.add_edge(p, ix, ()).unwrap();
        }
        prev = Some(ix);
    }
    g
}

#[test]
fn graph_starts_empty() {
    let g: Graph<(), ()> = Graph::new();
    assert!(g.is_empty());
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn graph_add_keyed_node_reuses_the_existing_index() {
    let mut g: Graph<&str, ()> = Graph::new();
    let a = g.add_keyed_node("a", "first");
    let again = g.add_keyed_node("a", "second");
    assert_eq!(a, again);
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.node(a), Some(&"second"));
    assert_eq!(g.node_ix("a"), Some(a));
    assert_eq!(g.node_key(a), Some("a"));
}

#[test]
fn graph_anonymous_nodes_have_no_key() {
    let mut g: Graph<(), ()> = Graph::new();
    let v = g.add_node(());
    assert_eq!(g.node_key(v), None);
    assert!(g.contains(v));
    assert!(!g.contains(NodeIx(1)));
}

#[test]
fn graph_add_edge_rejects_unknown_endpoints() {
    let mut g: Graph<(), ()> = Graph::new();
    let v = g.add_node(());
    assert_eq!(g.add_edge(v, NodeIx(7), ()), None);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn graph_keeps_parallel_edges_in_insertion_order() {
    let mut g: Graph<(), &str> = Graph::new();
    let a = g.add_node(());
    let b = g.add_node(());
    let e1 = g.add_edge(a, b, "one").unwrap();
    let e2 = g.add_edge(a, b, "two").unwrap();
    assert_eq!(g.out_edges(a), &[e1, e2]);
    assert_eq!(g.in_edges(b), &[e1, e2]);
    assert_eq!(g.successors(a).collect::<Vec<_>>(), vec![b, b]);
    assert_eq!(g.predecessors(b).collect::<Vec<_>>(), vec![a, a]);
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn graph_remove_edge_leaves_other_indices_stable() {
    let mut g = path_graph(&["a", "b", "c"]);
    let a = g.node_ix("a").unwrap();
    let b = g.node_ix("b").unwrap();
    let c = g.node_ix("c").unwrap();
    let ab = g.out_edges(a)[0];
    let bc = g.out_edges(b)[0];

    assert_eq!(g.remove_edge(ab), Some(()));
    assert_eq!(g.remove_edge(ab), None);
    assert_eq!(g.edge_count(), 1);
    assert!(g.out_edges(a).is_empty());
    assert!(g.in_edges(b).is_empty());
    assert_eq!(g.endpoints(bc), Some((b, c)));
    assert_eq!(g.edge_indices().collect::<Vec<EdgeIx>>(), vec![bc]);

    let ac = g.add_edge(a, c, ()).unwrap();
    assert_eq!(ac, EdgeIx(2));
    assert_eq!(g.in_edges(c), &[bc, ac]);
}

#[test]
fn graph_neighbors_lists_predecessors_then_successors() {
    let g = path_graph(&["a", "b", "c"]);
    let a = g.node_ix("a").unwrap();
    let b = g.node_ix("b").unwrap();
    let c = g.node_ix("c").unwrap();
    assert_eq!(g.neighbors(b).collect::<Vec<_>>(), vec![a, c]);
}

#[test]
fn graph_clear_drops_nodes_edges_and_keys() {
    let mut g = path_graph(&["a", "b"]);
    g.clear();
    assert!(g.is_empty());
    assert_eq!(g.edge_count(), 0);
    assert!(!g.has_node("a"));
}

#[test]
fn graph_node_mut_and_edge_mut_update_labels() {
    let mut g: Graph<i32, i32> = Graph::new();
    let a = g.add_node(1);
    let b = g.add_node(2);
    let e = g.add_edge(a, b, 10).unwrap();
    *g.node_mut(a).unwrap() += 5;
    *g.edge_mut(e).unwrap() += 1;
    assert_eq!(g.node(a), Some(&6));
    assert_eq!(g.edge(e), Some(&11));
    let labels: Vec<i32> = g.nodes().map(|(_, n)| *n).collect();
    assert_eq!(labels, vec![6, 2]);
}
