//! Normalize long edges by inserting routing nodes.
//!
//! An edge spanning `k > 1` layers is replaced by a chain of `k` span-1 edges through `k - 1`
//! routing nodes, one per intermediate layer. Routing rows are interpolated linearly between the
//! endpoints. Every segment keeps the original edge label so the chain can be walked back to the
//! prerequisite link it carries.

use crate::error::{Error, Result};
use crate::model::LayoutNode;
use crate::tree::Tree;
use arbor_graph::EdgeIx;

/// Returns the number of routing nodes inserted.
pub fn run(tree: &mut Tree) -> Result<usize> {
    let mut long: Vec<EdgeIx> = Vec::new();
    for (e, v, w, _) in tree.graph().edges() {
        let span = tree.span_between(v, w)?;
        if span < 1 {
            return Err(Error::InvalidSpan {
                from: tree.label(v),
                to: tree.label(w),
                span,
            });
        }
        if span > 1 {
            long.push(e);
        }
    }

    let mut inserted = 0;
    for e in long {
        let Some((v, w)) = tree.graph().endpoints(e) else {
            continue;
        };
        let (x_in, x_out) = (tree.x(v), tree.x(w));
        let (y_in, y_out) = (tree.yf(v), tree.yf(w));
        let step = (y_out - y_in) / f64::from(x_out - x_in);

        let g = tree.graph_mut();
        let Some(label) = g.remove_edge(e) else {
            continue;
        };
        let mut prev = v;
        for x in (x_in + 1)..x_out {
            let yf = y_in + step * f64::from(x - x_in);
            let routing = g.add_node(LayoutNode::routing(x, yf));
            g.add_edge(prev, routing, label);
            prev = routing;
            inserted += 1;
        }
        g.add_edge(prev, w, label);
    }

    tree.index_layers();
    tracing::debug!(inserted, "normalized long edges");
    Ok(inserted)
}

/// Fails unless every edge spans exactly one layer.
pub fn check_normalized(tree: &Tree) -> Result<()> {
    for (_, v, w, _) in tree.graph().edges() {
        let span = tree.span_between(v, w)?;
        if span != 1 {
            return Err(Error::NotNormalized {
                from: tree.label(v),
                to: tree.label(w),
                span,
            });
        }
    }
    Ok(())
}
