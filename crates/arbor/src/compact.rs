//! Gap-free initial rows.

use crate::tree::Tree;

/// Gives each layer the rows `1..=count`, keeping the current top-to-bottom order.
pub fn run(tree: &mut Tree) {
    for x in 1..=tree.max_layer() {
        for (i, v) in tree.layer_ordered(x).into_iter().enumerate() {
            tree.set_y(v, i as i32 + 1);
        }
    }
}
