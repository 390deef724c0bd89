//! Exact rectangle packing decision engine.
//!
//! Given a set of rectangles (some rotatable) and a target bounding box,
//! [`probe`] either produces exact, non-overlapping coordinates for every
//! rectangle or proves that no such placement exists. The engine combines
//! per-axis interval domains, incremental constraint propagation over
//! occupancy vectors ("compression"), precomputed domination tables to prune
//! symmetric placements, and depth-first backtracking with exact undo.
//!
//! The crate is strictly single-threaded and performs no I/O besides `log`
//! statements; importing instances and exporting solutions is the job of a
//! driver (see the `mbb` crate).

/// Value types: rectangles, intervals, instances, boxes, solutions
pub mod entities;

/// Per-axis occupancy model: capacity vectors, waste histogram, compression
pub mod occupancy;

/// Domination tables pruning dominated wall-gap placements
pub mod domination;

/// Search drivers: coordinate ranges, branching order, the backtracking packer
pub mod search;

/// Helper containers and state verification functions
pub mod util;

pub use entities::{BoxDims, Instance, Placement, RectDesc, RectId, Solution};
pub use search::{Counters, PackConfig, ProbeReport, probe};
