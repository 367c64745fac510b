//! Layer assignment.
//!
//! Longest-path layering, banded by tech level: tech levels are processed in increasing order
//! and each band starts right after the last layer used by the band before it. Within a band a
//! node sits one layer past its right-most prerequisite.

use crate::error::{Error, Result};
use crate::model::TechLevel;
use crate::tree::{LayerRange, Tree};
use arbor_graph::NodeIx;
use std::collections::BTreeMap;

fn bands(tree: &Tree) -> BTreeMap<TechLevel, Vec<NodeIx>> {
    let mut bands: BTreeMap<TechLevel, Vec<NodeIx>> = BTreeMap::new();
    for (v, c) in tree.content_nodes() {
        bands.entry(c.tech_level).or_default().push(v);
    }
    bands
}

/// Pushes `v` to at least `min` and past all of its predecessors. Returns whether `x` changed.
fn set_depth(tree: &mut Tree, v: NodeIx, min: i32) -> bool {
    let after_prerequisites = tree
        .graph()
        .predecessors(v)
        .map(|u| tree.x(u) + 1)
        .max()
        .unwrap_or(1);
    let depth = min.max(after_prerequisites);
    match tree.graph_mut().node_mut(v) {
        Some(n) if depth > n.x => {
            n.x = depth;
            true
        }
        _ => false,
    }
}

pub fn run(tree: &mut Tree, max_passes: usize) -> Result<()> {
    let bands = bands(tree);
    tree.set_tech_levels(bands.keys().copied().collect());

    for vs in bands.values() {
        for &v in vs {
            if let Some(n) = tree.graph_mut().node_mut(v) {
                n.x = 0;
            }
        }
    }

    let mut converged = false;
    for _ in 0..max_passes {
        let mut changed = false;
        let mut depth = 1;
        for vs in bands.values() {
            for _ in 0..max_passes {
                let mut band_changed = false;
                for &v in vs {
                    band_changed |= set_depth(tree, v, depth);
                }
                changed |= band_changed;
                if !band_changed {
                    break;
                }
            }
            depth = vs.iter().map(|&v| tree.x(v)).max().unwrap_or(depth - 1) + 1;
        }
        if !changed {
            converged = true;
            break;
        }
    }
    if !converged {
        tracing::warn!(max_passes, "layer assignment did not settle");
    }

    let bounds: BTreeMap<TechLevel, LayerRange> = bands
        .iter()
        .filter_map(|(&level, vs)| {
            let min = vs.iter().map(|&v| tree.x(v)).min()?;
            let max = vs.iter().map(|&v| tree.x(v)).max()?;
            Some((level, LayerRange { min, max }))
        })
        .collect();
    tree.set_tech_level_bounds(bounds);
    tree.index_layers();

    check_spans(tree)
}

/// Every edge must point strictly to the right.
pub fn check_spans(tree: &Tree) -> Result<()> {
    for (_, v, w, _) in tree.graph().edges() {
        let span = tree.span_between(v, w)?;
        if span < 1 {
            return Err(Error::InvalidSpan {
                from: tree.label(v),
                to: tree.label(w),
                span,
            });
        }
    }
    Ok(())
}
