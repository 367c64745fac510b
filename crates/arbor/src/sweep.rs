//! Control loop shared by the minimization phases.

/// What a bounded sweep loop did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub sweeps: usize,
    pub improving: usize,
}

/// Calls `sweep(iteration)` until it has failed to improve `patience` times in a row, or
/// `max_sweeps` sweeps ran. `sweep` reports whether it improved its metric.
pub(crate) fn run_sweeps<F>(max_sweeps: usize, patience: usize, mut sweep: F) -> SweepStats
where
    F: FnMut(usize) -> bool,
{
    let patience = patience.max(1);
    let mut stats = SweepStats::default();
    let mut stale = 0;
    while stats.sweeps < max_sweeps && stale < patience {
        let improved = sweep(stats.sweeps);
        stats.sweeps += 1;
        if improved {
            stats.improving += 1;
            stale = 0;
        } else {
            stale += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::run_sweeps;

    #[test]
    fn run_sweeps_stops_after_patience_runs_out() {
        let mut calls = Vec::new();
        let stats = run_sweeps(50, 2, |i| {
            calls.push(i);
            i < 3
        });
        assert_eq!(calls, vec![0, 1, 2, 3, 4]);
        assert_eq!(stats.sweeps, 5);
        assert_eq!(stats.improving, 3);
    }

    #[test]
    fn run_sweeps_respects_the_cap() {
        let stats = run_sweeps(7, 2, |_| true);
        assert_eq!(stats.sweeps, 7);
        assert_eq!(stats.improving, 7);
    }

    #[test]
    fn run_sweeps_resets_patience_on_improvement() {
        let pattern = [false, true, false, true, false, false, true];
        let stats = run_sweeps(50, 2, |i| pattern.get(i).copied().unwrap_or(false));
        assert_eq!(stats.sweeps, 6);
    }

    #[test]
    fn run_sweeps_with_zero_cap_never_calls() {
        let stats = run_sweeps(0, 2, |_| unreachable!());
        assert_eq!(stats.sweeps, 0);
    }
}
