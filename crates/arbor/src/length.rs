//! Edge length reduction.
//!
//! Runs after crossing minimization and only moves nodes within their layer. A move (into an
//! empty row, or a swap with the row's occupant) is kept when the layer's crossing count does not
//! rise and the length of the edges touching the layer drops by more than `epsilon`.

use crate::config::LayoutOptions;
use crate::error::Result;
use crate::normalize::check_normalized;
use crate::order::{layer_crossings, total_crossings};
use crate::sweep::{SweepStats, run_sweeps};
use crate::tree::Tree;
use arbor_graph::NodeIx;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LengthReport {
    pub before: f64,
    pub after: f64,
    pub crossings: usize,
    pub local: SweepStats,
    pub global: SweepStats,
}

pub fn total_edge_length(tree: &Tree) -> f64 {
    tree.graph()
        .edge_indices()
        .map(|e| tree.edge_length(e))
        .sum()
}

/// Length of every edge with an endpoint in `layer`.
pub fn layer_edge_length(tree: &Tree, layer: i32) -> f64 {
    let g = tree.graph();
    tree.layer(layer)
        .into_iter()
        .flat_map(|v| g.in_edges(v).iter().chain(g.out_edges(v)).copied())
        .map(|e| tree.edge_length(e))
        .sum()
}

/// Moves `v` to `row` (swapping with the node already there, if any). Keeps the move and returns
/// the new layer length when it is accepted; otherwise puts everything back.
fn try_row(
    tree: &mut Tree,
    v: NodeIx,
    row: i32,
    crossings: usize,
    length: f64,
    epsilon: f64,
) -> Option<f64> {
    let layer = tree.x(v);
    let from = tree.y(v);
    let occupant = tree.node_at(layer, row);
    match occupant {
        Some(w) => {
            tree.swap_rows(v, w);
        }
        None => tree.set_y(v, row),
    }

    let moved = layer_edge_length(tree, layer);
    if layer_crossings(tree, layer) <= crossings && length - moved > epsilon {
        return Some(moved);
    }

    match occupant {
        Some(w) => {
            tree.swap_rows(w, v);
        }
        None => tree.set_y(v, from),
    }
    None
}

fn try_rows(tree: &mut Tree, v: NodeIx, lo: i32, hi: i32, epsilon: f64) -> bool {
    let layer = tree.x(v);
    let crossings = layer_crossings(tree, layer);
    let mut length = layer_edge_length(tree, layer);
    let mut moved = false;
    for row in lo.max(1)..=hi {
        if row == tree.y(v) {
            continue;
        }
        if let Some(after) = try_row(tree, v, row, crossings, length, epsilon) {
            length = after;
            moved = true;
        }
    }
    moved
}

/// Per-edge pass over one layer: each node is tried on the rows between itself and each of its
/// neighbours on the previous (`forward`) or next layer.
pub fn local_layer(tree: &mut Tree, layer: i32, forward: bool, epsilon: f64) {
    let expected = if forward { layer - 1 } else { layer + 1 };
    for v in tree.layer_ordered(layer) {
        let neighbours = if forward {
            tree.in_nodes(v)
        } else {
            tree.out_nodes(v)
        };
        for u in neighbours {
            if tree.x(u) != expected {
                tracing::warn!(
                    node = %tree.label(v),
                    neighbour = %tree.label(u),
                    layer,
                    "edge does not end on the adjacent layer"
                );
                continue;
            }
            let (a, b) = (tree.y(v), tree.y(u));
            try_rows(tree, v, a.min(b), a.max(b), epsilon);
        }
    }
}

/// Whole-layer pass: each node is tried on every row between its top-most and bottom-most
/// neighbour on either side.
pub fn global_layer(tree: &mut Tree, layer: i32, epsilon: f64) {
    for v in tree.layer_ordered(layer) {
        let rows: Vec<i32> = tree
            .graph()
            .neighbors(v)
            .map(|u| tree.y(u))
            .chain(std::iter::once(tree.y(v)))
            .collect();
        let (Some(&lo), Some(&hi)) = (rows.iter().min(), rows.iter().max()) else {
            continue;
        };
        try_rows(tree, v, lo, hi, epsilon);
    }
}

fn layers(tree: &Tree, iteration: usize) -> Vec<i32> {
    let last = tree.max_layer();
    if iteration % 2 == 0 {
        (1..=last).collect()
    } else {
        (1..=last).rev().collect()
    }
}

pub fn local_sweep(tree: &mut Tree, iteration: usize, epsilon: f64) -> bool {
    let before = total_edge_length(tree);
    let forward = iteration % 2 == 0;
    for layer in layers(tree, iteration) {
        if (forward && layer == 1) || (!forward && layer == tree.max_layer()) {
            continue;
        }
        local_layer(tree, layer, forward, epsilon);
    }
    total_edge_length(tree) + epsilon < before
}

pub fn global_sweep(tree: &mut Tree, iteration: usize, epsilon: f64) -> bool {
    let before = total_edge_length(tree);
    for layer in layers(tree, iteration) {
        global_layer(tree, layer, epsilon);
    }
    total_edge_length(tree) + epsilon < before
}

/// Shortens edges without adding crossings. Expects a normalized tree.
pub fn minimize_edge_length(tree: &mut Tree, opts: &LayoutOptions) -> Result<LengthReport> {
    check_normalized(tree)?;
    let before = total_edge_length(tree);

    let local = run_sweeps(opts.max_sweeps, opts.sweep_patience, |iteration| {
        local_sweep(tree, iteration, opts.epsilon)
    });
    let global = run_sweeps(opts.max_sweeps, opts.sweep_patience, |iteration| {
        global_sweep(tree, iteration, opts.epsilon)
    });

    let report = LengthReport {
        before,
        after: total_edge_length(tree),
        crossings: total_crossings(tree),
        local,
        global,
    };
    tracing::debug!(
        before = report.before,
        after = report.after,
        local_sweeps = report.local.sweeps,
        global_sweeps = report.global.sweeps,
        "minimized edge length"
    );
    Ok(report)
}
