use crate::tree::Tree;
use arbor_graph::NodeIx;

/// Which side of a layer an edge set is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Edges arriving from the layer to the left.
    In,
    /// Edges leaving towards the layer to the right.
    Out,
}

fn boundary_rows(tree: &Tree, layer: i32, boundary: Boundary) -> Vec<(i32, i32)> {
    let g = tree.graph();
    let mut rows: Vec<(i32, i32)> = Vec::new();
    for v in tree.layer(layer) {
        let edges = match boundary {
            Boundary::In => g.in_edges(v),
            Boundary::Out => g.out_edges(v),
        };
        for &e in edges {
            let Some((from, to)): Option<(NodeIx, NodeIx)> = g.endpoints(e) else {
                continue;
            };
            rows.push((tree.y(from), tree.y(to)));
        }
    }
    rows
}

/// Crossings between the edges on one side of `layer`.
///
/// Edges are sorted by `(in.y, out.y)`; two edges cross when their `out.y` order is the inverse
/// of their `in.y` order. Equal rows on either side never count as a crossing.
pub fn boundary_crossings(tree: &Tree, layer: i32, boundary: Boundary) -> usize {
    let mut rows = boundary_rows(tree, layer, boundary);
    count_inversions(&mut rows)
}

/// Crossings a reordering of `layer` can affect: both of its boundaries, or the single one the
/// first and last layer have.
pub fn layer_crossings(tree: &Tree, layer: i32) -> usize {
    let last = tree.max_layer();
    if layer <= 1 {
        return boundary_crossings(tree, layer, Boundary::Out);
    }
    if layer >= last {
        return boundary_crossings(tree, layer, Boundary::In);
    }
    boundary_crossings(tree, layer, Boundary::In) + boundary_crossings(tree, layer, Boundary::Out)
}

/// Crossings of the whole grid, counting every layer boundary once.
pub fn total_crossings(tree: &Tree) -> usize {
    (2..=tree.max_layer())
        .map(|layer| boundary_crossings(tree, layer, Boundary::In))
        .sum()
}

// Accumulator tree (Barth, Jünger, Mutzel) over the compressed `out.y` positions: inserting an
// edge adds up the already inserted edges that land strictly further down.
fn count_inversions(rows: &mut [(i32, i32)]) -> usize {
    if rows.len() < 2 {
        return 0;
    }
    rows.sort_unstable();

    let mut south: Vec<i32> = rows.iter().map(|&(_, out)| out).collect();
    south.sort_unstable();
    south.dedup();

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut crossings: usize = 0;
    for &(_, out) in rows.iter() {
        let Ok(pos) = south.binary_search(&out) else {
            continue;
        };
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum: usize = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        crossings += weight_sum;
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::count_inversions;

    fn brute_force(rows: &[(i32, i32)]) -> usize {
        let mut rows = rows.to_vec();
        rows.sort();
        let mut n = 0;
        for i in 0..rows.len() {
            for j in (i + 1)..rows.len() {
                if rows[j].1 < rows[i].1 {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn count_inversions_is_zero_for_parallel_edges() {
        assert_eq!(count_inversions(&mut [(1, 1), (2, 2), (3, 3)]), 0);
    }

    #[test]
    fn count_inversions_ignores_shared_endpoints() {
        assert_eq!(count_inversions(&mut [(1, 2), (1, 1), (2, 2), (3, 2)]), 0);
    }

    #[test]
    fn count_inversions_matches_pairwise_counting() {
        let rows = [(1, 4), (2, 1), (2, 3), (3, 2), (4, 1), (5, 5), (5, 2), (7, 1)];
        assert_eq!(count_inversions(&mut rows.clone()), brute_force(&rows));
    }

    #[test]
    fn count_inversions_handles_sparse_rows() {
        let rows = [(1, 90), (40, 3), (41, 17)];
        assert_eq!(count_inversions(&mut rows.clone()), 2);
    }
}
