//! Row ordering / crossing minimization.
//!
//! Rows are seeded by descendant count, then improved by alternating barycenter sweeps and
//! finally by greedy pairwise swaps that never add crossings.

mod types;
pub use types::Relationship;

mod cross_count;
pub use cross_count::{Boundary, boundary_crossings, layer_crossings, total_crossings};

mod init_order;
pub use init_order::init_order;

mod barycenter;
pub use barycenter::{barycenter_layer, barycenter_sweep};

mod greedy;
pub use greedy::{greedy_layer, greedy_sweep};

mod ordering;
pub use ordering::{CrossingReport, minimize_crossings};
