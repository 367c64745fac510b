//! Layered grid layout for prerequisite (technology) trees.
//!
//! Records name their prerequisites and a tech level. The pipeline turns them into a grid:
//! every record gets a layer (column) to the right of all of its prerequisites and of every lower
//! tech level, and a row chosen to keep edge crossings and edge lengths small. Links spanning more
//! than one layer are carried by routing nodes so every edge ends up between adjacent layers.
//!
//! [`pipeline::run`] performs a build synchronously; [`LayoutEngine`] wraps it in the
//! `NotInitialized -> Initializing -> Initialized` lifecycle with background or incremental
//! execution.

pub use arbor_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod compact;
pub mod config;
pub mod consistency;
pub mod edges;
pub mod engine;
mod error;
pub mod length;
pub mod model;
pub mod normalize;
pub mod order;
pub mod output;
pub mod pipeline;
pub mod prune;
pub mod rank;
mod sweep;
pub mod tree;

pub use config::{ExecutionMode, LayoutOptions};
pub use engine::{LayoutEngine, Phase, StepOutcome};
pub use error::{Error, Result};
pub use model::{ContentNode, Definition, LayoutEdge, LayoutNode, NodeKind, TechLevel};
pub use output::{EdgePath, Layout, NodePlacement, TechLevelBand, Waypoint};
pub use pipeline::Step;
pub use sweep::SweepStats;
pub use tree::{Diagnostic, GridSize, LayerRange, Tree};
