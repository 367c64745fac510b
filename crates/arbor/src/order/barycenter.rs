//! Barycenter placement.
//!
//! A node's barycenter is the mean row of its neighbours on one side (its own row when it has
//! none). Nodes are sorted by barycenter and grouped into blocks of (nearly) equal value; each
//! block is centred on its barycenter but never overlaps the block placed before it.

use super::{Relationship, total_crossings};
use crate::tree::Tree;
use arbor_graph::NodeIx;

fn barycenter(tree: &Tree, v: NodeIx, relationship: Relationship) -> f64 {
    let neighbours: Vec<NodeIx> = match relationship {
        Relationship::InEdges => tree.in_nodes(v),
        Relationship::OutEdges => tree.out_nodes(v),
    };
    if neighbours.is_empty() {
        return tree.yf(v);
    }
    let sum: f64 = neighbours.iter().map(|&u| tree.yf(u)).sum();
    sum / neighbours.len() as f64
}

/// Reassigns the rows of `layer` from barycenters. Equal barycenters keep the current row
/// order, then arena order.
pub fn barycenter_layer(tree: &mut Tree, layer: i32, relationship: Relationship, epsilon: f64) {
    let mut entries: Vec<(f64, NodeIx)> = tree
        .layer_ordered(layer)
        .into_iter()
        .map(|v| (barycenter(tree, v, relationship), v))
        .collect();
    entries.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut blocks: Vec<(f64, Vec<NodeIx>)> = Vec::new();
    for (value, v) in entries {
        if let Some((key, members)) = blocks.last_mut() {
            if (value - *key).abs() <= epsilon {
                members.push(v);
                continue;
            }
        }
        blocks.push((value, vec![v]));
    }

    let mut next_row: i32 = 1;
    for (key, members) in blocks {
        let centred = (key - (members.len() as f64 - 1.0) / 2.0) as i32;
        let mut row = next_row.max(centred);
        for v in members {
            tree.set_y(v, row);
            row += 1;
        }
        next_row = row;
    }
}

/// One barycenter pass: even iterations sweep left to right using in-neighbours, odd ones right
/// to left using out-neighbours. Returns whether the total crossing count went down.
pub fn barycenter_sweep(tree: &mut Tree, iteration: usize, epsilon: f64) -> bool {
    let before = total_crossings(tree);
    let last = tree.max_layer();
    if iteration % 2 == 0 {
        for layer in 2..=last {
            barycenter_layer(tree, layer, Relationship::InEdges, epsilon);
        }
    } else {
        for layer in (1..last).rev() {
            barycenter_layer(tree, layer, Relationship::OutEdges, epsilon);
        }
    }
    total_crossings(tree) < before
}
