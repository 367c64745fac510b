//! Arena graph container used by `arbor`.
//!
//! The layout engine mutates its graph heavily (long edges are split into chains, rows are
//! swapped thousands of times), so nodes and edges are addressed by stable indices instead of
//! string keys or pointers.

mod graph;

pub use graph::{EdgeIx, Graph, NodeIx, alg};
