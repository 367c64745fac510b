//! Removes rows that no layer uses.

use crate::tree::Tree;
use std::collections::BTreeSet;

/// Shifts rows up over every row that is empty in all layers, so the used rows become
/// `1..=rows`. Relative order within and across layers is unchanged. Returns the number of
/// rows removed.
pub fn run(tree: &mut Tree) -> usize {
    let occupied: BTreeSet<i32> = tree.graph().nodes().map(|(_, n)| n.y()).collect();
    let Some(&max_row) = occupied.last() else {
        return 0;
    };

    // Rank of each used row; an empty row between two used ones pulls everything below it up
    // by one.
    let target: Vec<(arbor_graph::NodeIx, i32)> = tree
        .graph()
        .nodes()
        .filter_map(|(v, n)| {
            let rank = occupied.range(..n.y()).count() as i32 + 1;
            (rank != n.y()).then_some((v, rank))
        })
        .collect();
    for (v, y) in target {
        tree.set_y(v, y);
    }

    let removed = (max_row - occupied.len() as i32).max(0) as usize;
    if removed > 0 {
        tracing::debug!(removed, "removed empty rows");
    }
    removed
}
