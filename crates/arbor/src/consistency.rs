//! Best-effort repair of prerequisite data.
//!
//! Each pass first drops redundant prerequisites (a prerequisite that is also reachable through
//! another prerequisite), then raises tech levels so that no node sits below one of its
//! prerequisites. Passes repeat until one changes nothing or the pass cap is hit; hitting the cap
//! is logged and the graph is used as-is.

use crate::model::TechLevel;
use crate::tree::Tree;
use arbor_graph::{NodeIx, alg};
use rustc_hash::FxHashSet as HashSet;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub passes: usize,
    pub redundant_removed: usize,
    pub levels_raised: usize,
    pub converged: bool,
}

fn prerequisites(tree: &Tree, v: NodeIx) -> &[NodeIx] {
    tree.node(v)
        .and_then(|n| n.as_content())
        .map(|c| c.prerequisites.as_slice())
        .unwrap_or(&[])
}

fn tech_level(tree: &Tree, v: NodeIx) -> Option<TechLevel> {
    tree.node(v).and_then(|n| n.as_content()).map(|c| c.tech_level)
}

pub fn run(tree: &mut Tree, max_passes: usize) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();
    while report.passes < max_passes {
        report.passes += 1;
        if check_once(tree, &mut report) {
            report.converged = true;
            break;
        }
    }
    if !report.converged {
        tracing::warn!(
            passes = report.passes,
            "tried fixing prerequisite issues for {max_passes} passes, giving up"
        );
    }
    report
}

/// One repair pass. Returns `true` when nothing had to change.
fn check_once(tree: &mut Tree, report: &mut ConsistencyReport) -> bool {
    let removed = remove_redundant_prerequisites(tree);
    let raised = raise_tech_levels(tree);
    report.redundant_removed += removed;
    report.levels_raised += raised;
    removed == 0 && raised == 0
}

fn remove_redundant_prerequisites(tree: &mut Tree) -> usize {
    let nodes: Vec<NodeIx> = tree.content_nodes().map(|(v, _)| v).collect();
    let mut removed = 0;
    for v in nodes {
        let direct = prerequisites(tree, v).to_vec();
        if direct.is_empty() {
            continue;
        }
        let upstream: HashSet<NodeIx> =
            alg::reachable(direct.iter().copied(), |u| prerequisites(tree, u).to_vec())
                .into_iter()
                .collect();

        let mut redundant: Vec<NodeIx> = Vec::new();
        for p in &direct {
            if upstream.contains(p) && !redundant.contains(p) {
                redundant.push(*p);
            }
        }
        if redundant.is_empty() {
            continue;
        }

        let names: Vec<String> = redundant.iter().map(|&p| tree.label(p)).collect();
        tracing::warn!(
            node = %tree.label(v),
            redundant = %names.join(", "),
            "redundant prerequisites, removing"
        );
        if let Some(c) = tree.graph_mut().node_mut(v).and_then(|n| n.as_content_mut()) {
            c.prerequisites.retain(|p| !redundant.contains(p));
        }
        removed += redundant.len();
    }
    removed
}

fn raise_tech_levels(tree: &mut Tree) -> usize {
    let nodes: Vec<NodeIx> = tree.content_nodes().map(|(v, _)| v).collect();
    let mut children: Vec<Vec<NodeIx>> = vec![Vec::new(); tree.node_count()];
    for &v in &nodes {
        for &p in prerequisites(tree, v) {
            if let Some(list) = children.get_mut(p.index()) {
                if !list.contains(&v) {
                    list.push(v);
                }
            }
        }
    }

    let mut queued: Vec<bool> = vec![false; tree.node_count()];
    let mut queue: VecDeque<NodeIx> = VecDeque::with_capacity(nodes.len());
    for &v in &nodes {
        queued[v.index()] = true;
        queue.push_back(v);
    }

    let mut raised = 0;
    while let Some(v) = queue.pop_front() {
        queued[v.index()] = false;
        let Some(level) = tech_level(tree, v) else {
            continue;
        };
        let Some(required) = prerequisites(tree, v)
            .iter()
            .filter_map(|&p| tech_level(tree, p))
            .max()
        else {
            continue;
        };
        if required <= level {
            continue;
        }

        tracing::warn!(
            node = %tree.label(v),
            from = %level,
            to = %required,
            "tech level is lower than one of its prerequisites, increasing"
        );
        if let Some(c) = tree.graph_mut().node_mut(v).and_then(|n| n.as_content_mut()) {
            c.tech_level = required;
        }
        raised += 1;

        let parents = prerequisites(tree, v).to_vec();
        for &w in children[v.index()].iter().chain(parents.iter()) {
            if queued[w.index()] {
                continue;
            }
            tracing::debug!(node = %tree.label(w), "re-evaluating after a neighbour changed tech level");
            queued[w.index()] = true;
            queue.push_back(w);
        }
    }
    raised
}
