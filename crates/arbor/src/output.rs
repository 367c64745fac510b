//! What a finished layout hands to renderers: cell placements, edge polylines and tech-level
//! bands, detached from the working graph.

use crate::model::{NodeKind, TechLevel};
use crate::tree::{GridSize, Tree};
use arbor_graph::NodeIx;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    pub id: String,
    pub layer: i32,
    pub row: i32,
    pub tech_level: TechLevel,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub layer: i32,
    pub row: f64,
}

/// One prerequisite link, drawn through the routing nodes that carry it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePath {
    pub source: String,
    pub target: String,
    pub waypoints: Vec<Waypoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechLevelBand {
    pub tech_level: TechLevel,
    pub min_layer: i32,
    pub max_layer: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub size: GridSize,
    pub nodes: Vec<NodePlacement>,
    pub edges: Vec<EdgePath>,
    pub tech_levels: Vec<TechLevelBand>,
}

impl Layout {
    pub fn from_tree(tree: &Tree) -> Self {
        let nodes = tree
            .content_nodes()
            .map(|(v, c)| NodePlacement {
                id: c.id.clone(),
                layer: tree.x(v),
                row: tree.y(v),
                tech_level: c.tech_level,
                cost: c.cost,
            })
            .collect();

        let g = tree.graph();
        let mut edges: Vec<EdgePath> = Vec::new();
        for (v, c) in tree.content_nodes() {
            for &e in g.out_edges(v) {
                let Some(label) = g.edge(e) else {
                    continue;
                };
                let mut waypoints = vec![waypoint(tree, v)];
                let mut at = g.endpoints(e).map(|(_, w)| w);
                while let Some(w) = at {
                    waypoints.push(waypoint(tree, w));
                    at = next_segment(tree, w);
                }
                edges.push(EdgePath {
                    source: c.id.clone(),
                    target: tree.label(label.target),
                    waypoints,
                });
            }
        }

        let tech_levels = tree
            .tech_level_bounds()
            .iter()
            .map(|(&tech_level, range)| TechLevelBand {
                tech_level,
                min_layer: range.min,
                max_layer: range.max,
            })
            .collect();

        Self {
            size: tree.size(),
            nodes,
            edges,
            tech_levels,
        }
    }

    pub fn placement(&self, id: &str) -> Option<&NodePlacement> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Sorts `ids` by layer, then cost. Ids without a placement go last, in their given order.
    pub fn order_by_layer_and_cost(&self, ids: &mut [String]) {
        let by_id: FxHashMap<&str, &NodePlacement> =
            self.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        ids.sort_by(|a, b| match (by_id.get(a.as_str()), by_id.get(b.as_str())) {
            (Some(a), Some(b)) => a
                .layer
                .cmp(&b.layer)
                .then_with(|| a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}

fn waypoint(tree: &Tree, v: NodeIx) -> Waypoint {
    Waypoint {
        layer: tree.x(v),
        row: tree.yf(v),
    }
}

/// Routing nodes have exactly one outgoing segment; content nodes end the chain.
fn next_segment(tree: &Tree, v: NodeIx) -> Option<NodeIx> {
    match tree.node(v).map(|n| &n.kind) {
        Some(NodeKind::Routing) => tree.graph().successors(v).next(),
        _ => None,
    }
}
