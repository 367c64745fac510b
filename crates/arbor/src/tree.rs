//! The layout session: one graph plus the caches derived from it.

use crate::error::{Error, Result};
use crate::model::{ContentNode, LayoutEdge, LayoutNode, NodeKind, TechLevel};
use arbor_graph::{EdgeIx, Graph, NodeIx, alg};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub type LayoutGraph = Graph<LayoutNode, LayoutEdge>;

/// Inclusive layer range occupied by one tech level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub layers: i32,
    pub rows: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Two or more nodes share one grid cell.
    DuplicatePosition { x: i32, y: i32, nodes: Vec<NodeIx> },
    /// A node sits outside the `1..` grid.
    OutOfBounds { node: NodeIx, x: i32, y: i32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicatePosition { x, y, nodes } => {
                write!(f, "duplicated position {x}, {y}: {} nodes", nodes.len())
            }
            Diagnostic::OutOfBounds { node, x, y } => {
                write!(f, "out-of-bounds node {node} at {x}, {y}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    graph: LayoutGraph,
    tech_levels: Vec<TechLevel>,
    bounds: BTreeMap<TechLevel, LayerRange>,

    // `layers[x - 1]` lists the nodes of layer `x` in arena order. Only trusted while
    // `layers_dirty` is false; anything handing out `&mut LayoutGraph` marks it dirty.
    layers: Vec<Vec<NodeIx>>,
    layers_dirty: bool,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every node, edge and derived cache.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn graph(&self) -> &LayoutGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut LayoutGraph {
        self.layers_dirty = true;
        &mut self.graph
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn add_content(&mut self, node: ContentNode) -> NodeIx {
        let key = node.id.clone();
        self.layers_dirty = true;
        self.graph.add_keyed_node(key, LayoutNode::content(node))
    }

    pub fn node(&self, v: NodeIx) -> Option<&LayoutNode> {
        self.graph.node(v)
    }

    pub fn try_node(&self, v: NodeIx) -> Result<&LayoutNode> {
        self.graph.node(v).ok_or(Error::MissingNode(v))
    }

    pub fn content_ix(&self, id: &str) -> Option<NodeIx> {
        self.graph.node_ix(id)
    }

    pub fn content(&self, id: &str) -> Option<&ContentNode> {
        self.graph
            .node_ix(id)
            .and_then(|v| self.graph.node(v))
            .and_then(LayoutNode::as_content)
    }

    pub fn content_nodes(&self) -> impl Iterator<Item = (NodeIx, &ContentNode)> {
        self.graph
            .nodes()
            .filter_map(|(v, n)| n.as_content().map(|c| (v, c)))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn content_count(&self) -> usize {
        self.content_nodes().count()
    }

    pub fn routing_count(&self) -> usize {
        self.graph.nodes().filter(|(_, n)| n.is_routing()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn x(&self, v: NodeIx) -> i32 {
        self.graph.node(v).map_or(0, |n| n.x)
    }

    pub fn y(&self, v: NodeIx) -> i32 {
        self.graph.node(v).map_or(0, LayoutNode::y)
    }

    pub fn yf(&self, v: NodeIx) -> f64 {
        self.graph.node(v).map_or(0.0, |n| n.yf)
    }

    /// Moves `v` to row `y` without touching the layer index.
    pub fn set_y(&mut self, v: NodeIx, y: i32) {
        if let Some(n) = self.graph.node_mut(v) {
            n.set_y(y);
        }
    }

    pub fn set_yf(&mut self, v: NodeIx, yf: f64) {
        if let Some(n) = self.graph.node_mut(v) {
            n.yf = yf;
        }
    }

    /// Exchanges the rows of two nodes of the same layer. Refuses (and returns `false`) for
    /// nodes on different layers.
    pub fn swap_rows(&mut self, a: NodeIx, b: NodeIx) -> bool {
        let (xa, xb) = (self.x(a), self.x(b));
        if xa != xb {
            tracing::warn!(%a, %b, xa, xb, "can't swap nodes on different layers");
            return false;
        }
        let (ya, yb) = (self.yf(a), self.yf(b));
        if let Some(n) = self.graph.node_mut(a) {
            n.yf = yb;
        }
        if let Some(n) = self.graph.node_mut(b) {
            n.yf = ya;
        }
        true
    }

    pub fn tech_levels(&self) -> &[TechLevel] {
        &self.tech_levels
    }

    pub(crate) fn set_tech_levels(&mut self, levels: Vec<TechLevel>) {
        self.tech_levels = levels;
    }

    pub fn tech_level_bounds(&self) -> &BTreeMap<TechLevel, LayerRange> {
        &self.bounds
    }

    pub(crate) fn set_tech_level_bounds(&mut self, bounds: BTreeMap<TechLevel, LayerRange>) {
        self.bounds = bounds;
    }

    /// Rebuilds the per-layer membership index from the current `x` values.
    pub fn index_layers(&mut self) {
        let max = self.max_layer().max(0) as usize;
        let mut layers: Vec<Vec<NodeIx>> = vec![Vec::new(); max];
        for (v, n) in self.graph.nodes() {
            if n.x >= 1 {
                layers[(n.x - 1) as usize].push(v);
            }
        }
        self.layers = layers;
        self.layers_dirty = false;
    }

    pub fn max_layer(&self) -> i32 {
        if !self.layers_dirty && !self.layers.is_empty() {
            return self.layers.len() as i32;
        }
        self.graph.nodes().map(|(_, n)| n.x).max().unwrap_or(0)
    }

    pub fn max_row(&self) -> i32 {
        self.graph.nodes().map(|(_, n)| n.y()).max().unwrap_or(0)
    }

    pub fn size(&self) -> GridSize {
        GridSize {
            layers: self.max_layer(),
            rows: self.max_row(),
        }
    }

    /// Nodes of layer `x` in arena order.
    pub fn layer(&self, x: i32) -> Vec<NodeIx> {
        if !self.layers_dirty {
            return usize::try_from(x - 1)
                .ok()
                .and_then(|i| self.layers.get(i))
                .cloned()
                .unwrap_or_default();
        }
        self.graph
            .nodes()
            .filter(|(_, n)| n.x == x)
            .map(|(v, _)| v)
            .collect()
    }

    /// Nodes of layer `x` sorted by row; ties keep arena order.
    pub fn layer_ordered(&self, x: i32) -> Vec<NodeIx> {
        let mut nodes = self.layer(x);
        nodes.sort_by(|&a, &b| self.yf(a).total_cmp(&self.yf(b)).then(a.cmp(&b)));
        nodes
    }

    pub fn node_at(&self, x: i32, y: i32) -> Option<NodeIx> {
        self.layer(x).into_iter().find(|&v| self.y(v) == y)
    }

    pub fn row(&self, y: i32) -> Vec<NodeIx> {
        self.graph
            .nodes()
            .filter(|(_, n)| n.y() == y)
            .map(|(v, _)| v)
            .collect()
    }

    pub fn in_nodes(&self, v: NodeIx) -> Vec<NodeIx> {
        self.graph.predecessors(v).collect()
    }

    pub fn out_nodes(&self, v: NodeIx) -> Vec<NodeIx> {
        self.graph.successors(v).collect()
    }

    /// Number of distinct nodes downstream of `v`.
    pub fn descendant_count(&self, v: NodeIx) -> usize {
        alg::descendants(&self.graph, v).len()
    }

    pub fn edge_span(&self, e: EdgeIx) -> Option<i32> {
        let (v, w) = self.graph.endpoints(e)?;
        Some(self.x(w) - self.x(v))
    }

    /// Span of the edge `v -> w`; fails if either end is not in the arena.
    pub fn span_between(&self, v: NodeIx, w: NodeIx) -> Result<i32> {
        Ok(self.try_node(w)?.x - self.try_node(v)?.x)
    }

    /// Vertical distance covered by `e`, scaled by the number of layers it spans.
    pub fn edge_length(&self, e: EdgeIx) -> f64 {
        let Some((v, w)) = self.graph.endpoints(e) else {
            return 0.0;
        };
        let span = f64::from(self.x(w) - self.x(v));
        (self.yf(w) - self.yf(v)).abs() * span
    }

    /// Human-readable name of a node: the record id, or `routing@x,y`.
    pub fn label(&self, v: NodeIx) -> String {
        match self.graph.node(v).map(|n| &n.kind) {
            Some(NodeKind::Content(c)) => c.id.clone(),
            Some(NodeKind::Routing) => format!("routing@{},{}", self.x(v), self.y(v)),
            None => v.to_string(),
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut cells: BTreeMap<(i32, i32), Vec<NodeIx>> = BTreeMap::new();
        let mut out: Vec<Diagnostic> = Vec::new();
        for (v, n) in self.graph.nodes() {
            let (x, y) = (n.x, n.y());
            if x < 1 || y < 1 {
                out.push(Diagnostic::OutOfBounds { node: v, x, y });
            }
            cells.entry((x, y)).or_default().push(v);
        }
        for ((x, y), nodes) in cells {
            if nodes.len() > 1 {
                out.push(Diagnostic::DuplicatePosition { x, y, nodes });
            }
        }
        out
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |vs: Vec<NodeIx>| {
            vs.into_iter()
                .map(|v| self.label(v))
                .collect::<Vec<_>>()
                .join(", ")
        };
        for x in 1..=self.max_layer() {
            writeln!(f, "Layer {x}:")?;
            for v in self.layer_ordered(x) {
                writeln!(f, "\t{} ({}, {})", self.label(v), x, self.y(v))?;
                writeln!(f, "\t\tAbove: {}", names(self.in_nodes(v)))?;
                writeln!(f, "\t\tBelow: {}", names(self.out_nodes(v)))?;
            }
        }
        Ok(())
    }
}
