use super::{barycenter_sweep, greedy_sweep, init_order, total_crossings};
use crate::config::LayoutOptions;
use crate::error::Result;
use crate::normalize::check_normalized;
use crate::sweep::{SweepStats, run_sweeps};
use crate::tree::Tree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossingReport {
    pub before: usize,
    pub after: usize,
    pub barycenter: SweepStats,
    pub greedy: SweepStats,
}

/// Row assignment with the fewest crossings seen so far.
struct BestRows {
    rows: Vec<f64>,
    crossings: usize,
}

impl BestRows {
    fn take(tree: &Tree) -> Self {
        Self {
            rows: tree.graph().nodes().map(|(_, n)| n.yf).collect(),
            crossings: total_crossings(tree),
        }
    }

    fn keep_if_better(&mut self, tree: &Tree) {
        let crossings = total_crossings(tree);
        if crossings < self.crossings {
            *self = Self {
                rows: tree.graph().nodes().map(|(_, n)| n.yf).collect(),
                crossings,
            };
        }
    }

    fn restore(self, tree: &mut Tree) {
        let current = total_crossings(tree);
        if current <= self.crossings {
            return;
        }
        let nodes: Vec<_> = tree.graph().node_indices().collect();
        for (v, yf) in nodes.into_iter().zip(self.rows) {
            tree.set_yf(v, yf);
        }
    }
}

/// Reorders rows to reduce crossings. The result never has more crossings than the input.
pub fn minimize_crossings(tree: &mut Tree, opts: &LayoutOptions) -> Result<CrossingReport> {
    check_normalized(tree)?;

    let mut best = BestRows::take(tree);
    let before = best.crossings;

    init_order(tree);
    best.keep_if_better(tree);

    let barycenter = run_sweeps(opts.max_sweeps, opts.sweep_patience, |iteration| {
        let improved = barycenter_sweep(tree, iteration, opts.epsilon);
        best.keep_if_better(tree);
        improved
    });
    best.restore(tree);

    let greedy = run_sweeps(opts.max_sweeps, opts.sweep_patience, |iteration| {
        greedy_sweep(tree, iteration)
    });

    let report = CrossingReport {
        before,
        after: total_crossings(tree),
        barycenter,
        greedy,
    };
    tracing::debug!(
        before = report.before,
        after = report.after,
        barycenter_sweeps = report.barycenter.sweeps,
        greedy_sweeps = report.greedy.sweeps,
        "minimized crossings"
    );
    Ok(report)
}
