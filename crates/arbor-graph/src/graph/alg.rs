//! Traversal helpers over [`Graph`] and over ad-hoc adjacency functions.

use super::{Graph, NodeIx};
use rustc_hash::FxHashSet as HashSet;

/// Nodes reachable from `roots` in one or more steps of `next`, in discovery order.
///
/// A root only appears in the output if it can reach itself (or another root reaches it).
pub fn reachable<R, F, I>(roots: R, mut next: F) -> Vec<NodeIx>
where
    R: IntoIterator<Item = NodeIx>,
    F: FnMut(NodeIx) -> I,
    I: IntoIterator<Item = NodeIx>,
{
    let mut seen: HashSet<NodeIx> = HashSet::default();
    let mut out: Vec<NodeIx> = Vec::new();
    let mut stack: Vec<NodeIx> = Vec::new();
    for root in roots {
        stack.extend(next(root));
    }
    while let Some(v) = stack.pop() {
        if !seen.insert(v) {
            continue;
        }
        out.push(v);
        stack.extend(next(v));
    }
    out
}

/// Everything upstream of `v` (transitive predecessors).
pub fn ancestors<N, E>(g: &Graph<N, E>, v: NodeIx) -> Vec<NodeIx> {
    reachable([v], |u| g.predecessors(u).collect::<Vec<_>>())
}

/// Everything downstream of `v` (transitive successors).
pub fn descendants<N, E>(g: &Graph<N, E>, v: NodeIx) -> Vec<NodeIx> {
    reachable([v], |u| g.successors(u).collect::<Vec<_>>())
}

/// Nodes that lie on a directed cycle: members of a strongly connected component with more
/// than one node, plus nodes with a self loop. Returned in ascending index order.
pub fn cyclic_nodes<N, E>(g: &Graph<N, E>) -> Vec<NodeIx> {
    let n = g.node_count();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut stack: Vec<NodeIx> = Vec::new();
    let mut next_index: usize = 0;
    let mut out: Vec<NodeIx> = Vec::new();

    // Iterative Tarjan: each frame is (node, position in its successor list).
    for root in g.node_indices() {
        if index[root.0].is_some() {
            continue;
        }
        let mut frames: Vec<(NodeIx, usize)> = vec![(root, 0)];
        index[root.0] = Some(next_index);
        lowlink[root.0] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root.0] = true;

        while let Some(&(v, pos)) = frames.last() {
            let succ = g.out_edges(v).get(pos).and_then(|&e| g.endpoints(e));
            if let Some((_, w)) = succ {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                match index[w.0] {
                    None => {
                        index[w.0] = Some(next_index);
                        lowlink[w.0] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w.0] = true;
                        frames.push((w, 0));
                    }
                    Some(w_index) if on_stack[w.0] => {
                        lowlink[v.0] = lowlink[v.0].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                lowlink[parent.0] = lowlink[parent.0].min(lowlink[v.0]);
            }
            if Some(lowlink[v.0]) != index[v.0] {
                continue;
            }

            let mut component: Vec<NodeIx> = Vec::new();
            while let Some(w) = stack.pop() {
                on_stack[w.0] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            let self_loop = g.successors(v).any(|w| w == v);
            if component.len() > 1 || self_loop {
                out.extend(component);
            }
        }
    }

    out.sort();
    out
}
