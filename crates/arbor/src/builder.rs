//! Turns raw prerequisite records into layout nodes.
//!
//! Records on a prerequisite cycle are *hidden*; records with a hidden record anywhere upstream
//! are *locked*. Both are left out of the layout. Everything else becomes a content node whose
//! prerequisite list points at other content nodes. No edges are created here.

use crate::model::{ContentNode, Definition};
use crate::tree::Tree;
use arbor_graph::{Graph, NodeIx, alg};
use rayon::prelude::*;
use rustc_hash::FxHashSet as HashSet;

/// Record ids left out of the layout, in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    pub hidden: Vec<String>,
    pub locked: Vec<String>,
}

/// Graph of records: node label is the record's position in the input, edges run
/// prerequisite -> dependent. Duplicate ids keep the first record; unknown prerequisite ids are
/// dropped.
fn prerequisite_graph(definitions: &[Definition]) -> Graph<usize, ()> {
    let mut g: Graph<usize, ()> = Graph::with_capacity(definitions.len(), 0);
    for (i, def) in definitions.iter().enumerate() {
        if g.has_node(&def.id) {
            tracing::warn!(id = %def.id, "duplicate record id, keeping the first one");
            continue;
        }
        g.add_keyed_node(def.id.clone(), i);
    }

    for (i, def) in definitions.iter().enumerate() {
        let Some(v) = g.node_ix(&def.id) else {
            continue;
        };
        if g.node(v) != Some(&i) {
            continue;
        }
        for prerequisite in &def.prerequisites {
            match g.node_ix(prerequisite) {
                Some(u) => {
                    let _ = g.add_edge(u, v, ());
                }
                None => {
                    tracing::warn!(id = %def.id, %prerequisite, "unknown prerequisite, ignoring it");
                }
            }
        }
    }
    g
}

fn classify_graph(g: &Graph<usize, ()>) -> (Vec<NodeIx>, Vec<NodeIx>) {
    let hidden: Vec<NodeIx> = alg::cyclic_nodes(g);
    let hidden_set: HashSet<NodeIx> = hidden.iter().copied().collect();

    let candidates: Vec<NodeIx> = g.node_indices().collect();
    let locked: Vec<NodeIx> = candidates
        .par_iter()
        .copied()
        .filter(|v| !hidden_set.contains(v))
        .filter(|&v| {
            alg::ancestors(g, v)
                .iter()
                .any(|a| hidden_set.contains(a))
        })
        .collect();
    (hidden, locked)
}

pub fn classify(definitions: &[Definition]) -> Exclusions {
    let g = prerequisite_graph(definitions);
    let (hidden, locked) = classify_graph(&g);
    let id = |v: &NodeIx| g.node_key(*v).unwrap_or_default().to_string();
    Exclusions {
        hidden: hidden.iter().map(id).collect(),
        locked: locked.iter().map(id).collect(),
    }
}

/// Builds a fresh [`Tree`] holding one content node per kept record.
pub fn build(definitions: &[Definition]) -> Tree {
    let g = prerequisite_graph(definitions);
    let (hidden, locked) = classify_graph(&g);
    let excluded: HashSet<NodeIx> = hidden.iter().chain(locked.iter()).copied().collect();

    for v in &hidden {
        tracing::debug!(id = g.node_key(*v).unwrap_or_default(), "hiding cyclic record");
    }
    for v in &locked {
        tracing::debug!(
            id = g.node_key(*v).unwrap_or_default(),
            "locking record that depends on a hidden one"
        );
    }

    // Node payloads are independent of each other; `collect` keeps record order, which is the
    // only ordering the arena insert below relies on.
    let kept: Vec<NodeIx> = g.node_indices().filter(|v| !excluded.contains(v)).collect();
    let payloads: Vec<(ContentNode, &[String])> = kept
        .par_iter()
        .filter_map(|&v| {
            let def = definitions.get(*g.node(v)?)?;
            let node = ContentNode {
                id: def.id.clone(),
                tech_level: def.tech_level,
                cost: def.cost,
                prerequisites: Vec::with_capacity(def.prerequisites.len()),
            };
            Some((node, def.prerequisites.as_slice()))
        })
        .collect();

    let mut tree = Tree::new();
    let mut pending: Vec<(NodeIx, &[String])> = Vec::with_capacity(payloads.len());
    for (node, prerequisites) in payloads {
        pending.push((tree.add_content(node), prerequisites));
    }

    for (v, prerequisites) in pending {
        let resolved: Vec<NodeIx> = prerequisites
            .iter()
            .filter_map(|p| tree.content_ix(p))
            .collect();
        if let Some(c) = tree.graph_mut().node_mut(v).and_then(|n| n.as_content_mut()) {
            c.prerequisites = resolved;
        }
    }

    tracing::info!(
        nodes = tree.node_count(),
        hidden = hidden.len(),
        locked = locked.len(),
        "built layout nodes"
    );
    tree
}
