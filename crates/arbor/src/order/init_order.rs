use crate::tree::Tree;
use arbor_graph::NodeIx;

/// Seeds every layer's rows by ascending descendant count. Ties keep the current row order.
pub fn init_order(tree: &mut Tree) {
    for x in 1..=tree.max_layer() {
        let mut keyed: Vec<(usize, NodeIx)> = tree
            .layer_ordered(x)
            .into_iter()
            .map(|v| (tree.descendant_count(v), v))
            .collect();
        keyed.sort_by_key(|&(count, _)| count);
        for (i, (_, v)) in keyed.into_iter().enumerate() {
            tree.set_y(v, i as i32 + 1);
        }
    }
}
