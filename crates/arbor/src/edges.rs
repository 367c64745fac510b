//! One directed edge per prerequisite link.

use crate::model::LayoutEdge;
use crate::tree::Tree;
use arbor_graph::NodeIx;

/// Creates `prerequisite -> node` for every prerequisite of every content node. A prerequisite
/// listed twice yields two parallel edges. Does nothing on a tree that already has edges.
pub fn run(tree: &mut Tree) -> usize {
    if tree.edge_count() > 0 {
        tracing::warn!(edges = tree.edge_count(), "edges already created, skipping");
        return 0;
    }

    let links: Vec<(NodeIx, NodeIx)> = tree
        .content_nodes()
        .flat_map(|(v, c)| c.prerequisites.iter().map(move |&p| (p, v)))
        .collect();

    let g = tree.graph_mut();
    let mut created = 0;
    for (source, target) in links {
        if g.add_edge(source, target, LayoutEdge { source, target }).is_some() {
            created += 1;
        }
    }
    created
}
