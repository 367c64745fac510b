use super::{layer_crossings, total_crossings};
use crate::tree::Tree;

/// Tries every pair of nodes in `layer` and keeps a swap when it does not raise the layer's
/// crossing count. Stops early once the layer is crossing-free.
pub fn greedy_layer(tree: &mut Tree, layer: i32) {
    let mut current = layer_crossings(tree, layer);
    if current == 0 {
        return;
    }

    let nodes = tree.layer_ordered(layer);
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if !tree.swap_rows(nodes[i], nodes[j]) {
                continue;
            }
            let after = layer_crossings(tree, layer);
            if after <= current {
                current = after;
                if current == 0 {
                    return;
                }
            } else {
                tree.swap_rows(nodes[j], nodes[i]);
            }
        }
    }
}

/// One greedy pass, alternating direction by iteration. Returns whether the total crossing count
/// went down.
pub fn greedy_sweep(tree: &mut Tree, iteration: usize) -> bool {
    let before = total_crossings(tree);
    let last = tree.max_layer();
    if iteration % 2 == 0 {
        for layer in 1..=last {
            greedy_layer(tree, layer);
        }
    } else {
        for layer in (1..=last).rev() {
            greedy_layer(tree, layer);
        }
    }
    total_crossings(tree) < before
}
