//! The arena [`Graph`] container.
//!
//! Nodes are never removed individually; the whole graph is cleared instead. Edges can be
//! removed, which leaves a tombstone in the edge arena and detaches the edge from both endpoint
//! adjacency lists. Per-node edge lists keep insertion order.

use rustc_hash::FxBuildHasher;

mod entries;
mod index;

pub mod alg;

use entries::{EdgeEntry, NodeEntry};
pub use index::{EdgeIx, NodeIx};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, NodeIx>,

    edges: Vec<Option<EdgeEntry<E>>>,
    live_edges: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            live_edges: 0,
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            node_index: HashMap::with_capacity_and_hasher(nodes, FxBuildHasher),
            edges: Vec::with_capacity(edges),
            live_edges: 0,
        }
    }

    /// Drops every node and edge. Indices handed out before are invalid afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.live_edges = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, label: N) -> NodeIx {
        let ix = NodeIx(self.nodes.len());
        self.nodes.push(NodeEntry {
            key: None,
            label,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        });
        ix
    }

    /// Adds a node reachable through `key`. If the key is already taken, the existing node keeps
    /// its edges and gets `label` as its new label, like graphlib's `setNode`.
    pub fn add_keyed_node(&mut self, key: impl Into<String>, label: N) -> NodeIx {
        let key = key.into();
        if let Some(&ix) = self.node_index.get(&key) {
            self.nodes[ix.0].label = label;
            return ix;
        }
        let ix = NodeIx(self.nodes.len());
        self.nodes.push(NodeEntry {
            key: Some(key.clone()),
            label,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        });
        self.node_index.insert(key, ix);
        ix
    }

    pub fn has_node(&self, key: &str) -> bool {
        self.node_index.contains_key(key)
    }

    pub fn contains(&self, ix: NodeIx) -> bool {
        ix.0 < self.nodes.len()
    }

    pub fn node_ix(&self, key: &str) -> Option<NodeIx> {
        self.node_index.get(key).copied()
    }

    pub fn node_key(&self, ix: NodeIx) -> Option<&str> {
        self.nodes.get(ix.0).and_then(|n| n.key.as_deref())
    }

    pub fn node(&self, ix: NodeIx) -> Option<&N> {
        self.nodes.get(ix.0).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, ix: NodeIx) -> Option<&mut N> {
        self.nodes.get_mut(ix.0).map(|n| &mut n.label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIx> + use<N, E> {
        (0..self.nodes.len()).map(NodeIx)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIx, &N)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(ix, n)| (NodeIx(ix), &n.label))
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (NodeIx, &mut N)> {
        self.nodes
            .iter_mut()
            .enumerate()
            .map(|(ix, n)| (NodeIx(ix), &mut n.label))
    }

    /// Adds a directed edge `v -> w`. Parallel edges are allowed.
    ///
    /// Returns `None` when either endpoint is not in the graph.
    pub fn add_edge(&mut self, v: NodeIx, w: NodeIx, label: E) -> Option<EdgeIx> {
        if !self.contains(v) || !self.contains(w) {
            return None;
        }
        let ix = EdgeIx(self.edges.len());
        self.edges.push(Some(EdgeEntry { v, w, label }));
        self.nodes[v.0].out_edges.push(ix);
        self.nodes[w.0].in_edges.push(ix);
        self.live_edges += 1;
        Some(ix)
    }

    pub fn remove_edge(&mut self, e: EdgeIx) -> Option<E> {
        let entry = self.edges.get_mut(e.0)?.take()?;
        self.nodes[entry.v.0].out_edges.retain(|&x| x != e);
        self.nodes[entry.w.0].in_edges.retain(|&x| x != e);
        self.live_edges -= 1;
        Some(entry.label)
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn edge(&self, e: EdgeIx) -> Option<&E> {
        self.edges
            .get(e.0)
            .and_then(|slot| slot.as_ref())
            .map(|entry| &entry.label)
    }

    pub fn edge_mut(&mut self, e: EdgeIx) -> Option<&mut E> {
        self.edges
            .get_mut(e.0)
            .and_then(|slot| slot.as_mut())
            .map(|entry| &mut entry.label)
    }

    /// `(tail, head)` of a live edge.
    pub fn endpoints(&self, e: EdgeIx) -> Option<(NodeIx, NodeIx)> {
        self.edges
            .get(e.0)
            .and_then(|slot| slot.as_ref())
            .map(|entry| (entry.v, entry.w))
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(ix, _)| EdgeIx(ix))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIx, NodeIx, NodeIx, &E)> {
        self.edges.iter().enumerate().filter_map(|(ix, slot)| {
            slot.as_ref()
                .map(|entry| (EdgeIx(ix), entry.v, entry.w, &entry.label))
        })
    }

    pub fn in_edges(&self, v: NodeIx) -> &[EdgeIx] {
        self.nodes
            .get(v.0)
            .map(|n| n.in_edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn out_edges(&self, v: NodeIx) -> &[EdgeIx] {
        self.nodes
            .get(v.0)
            .map(|n| n.out_edges.as_slice())
            .unwrap_or(&[])
    }

    /// Tails of the in-edges of `v`, in edge order. Parallel edges repeat their tail.
    pub fn predecessors(&self, v: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.in_edges(v)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(u, _)| u))
    }

    /// Heads of the out-edges of `v`, in edge order. Parallel edges repeat their head.
    pub fn successors(&self, v: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.out_edges(v)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(_, w)| w))
    }

    /// Predecessors followed by successors.
    pub fn neighbors(&self, v: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.predecessors(v).chain(self.successors(v))
    }
}
