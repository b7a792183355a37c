//! Magic Hypercube Generator Library
//!
//! Enumerates arrangements of `1..=N^D` in a D-dimensional grid of side N in
//! which every axis-parallel line sums to the same constant. The search runs
//! over a precomputed segment chain (see [`topology`]), solidifies the axis
//! lines through the origin first, and expands each canonical solution into
//! its symmetric variants only when writing output.

pub mod cycle;
pub mod error;
pub mod generator;
pub mod grid;
pub mod output;
pub mod permutations;
pub mod progress;
pub mod solver;
pub mod topology;

pub use error::{GeneratorError, Result};
pub use generator::{GenerationReport, Generator};
pub use grid::Value;
pub use output::PrintMode;

/// Receives every canonical solution the generation pass finds.
///
/// `set` is indexed by set coordinate; use
/// [`topology::Topology::to_cube_order`] to get the grid itself.
pub trait SolutionSink {
    fn accept(&mut self, set: &[Value]) -> Result<()>;
}

impl<F> SolutionSink for F
where
    F: FnMut(&[Value]) -> Result<()>,
{
    fn accept(&mut self, set: &[Value]) -> Result<()> {
        self(set)
    }
}
