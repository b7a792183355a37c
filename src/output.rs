//! Writing solutions as tab-separated grids.
//!
//! Text layout: every value is followed by a tab, every innermost row by a
//! newline, and every completed sweep of a higher axis by one more newline.
//! A square therefore ends with a blank line, and a cube has a blank line
//! after each plane plus one after the cube.

use std::io::{self, Write};

use crate::error::Result;
use crate::grid::Value;
use crate::permutations::factorial;
use crate::topology::Topology;
use crate::SolutionSink;

/// What gets written for each canonical solution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrintMode {
    /// Every per-axis value reordering combined with every axis reordering.
    All,
    /// The canonical representative only.
    #[default]
    Identities,
    /// Nothing; solutions are only counted.
    None,
}

/// One symmetric variant of a solution, as indices into the topology's
/// permutation table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transformation {
    /// Which axis plays each grid role.
    pub axis_order: usize,
    /// Order in which each axis' positions are visited.
    pub value_orders: Vec<usize>,
}

impl Transformation {
    pub fn identity(dimensionality: usize) -> Self {
        Self {
            axis_order: 0,
            value_orders: vec![0; dimensionality],
        }
    }
}

/// A [`SolutionSink`] that writes grids to `out` as they are found.
pub struct GridPrinter<'t, W: Write> {
    topology: &'t Topology,
    mode: PrintMode,
    out: W,
}

impl<'t, W: Write> GridPrinter<'t, W> {
    pub fn new(topology: &'t Topology, mode: PrintMode, out: W) -> Self {
        Self { topology, mode, out }
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    /// Writes `set` under one transformation.
    pub fn write_grid(&mut self, set: &[Value], transformation: &Transformation) -> io::Result<()> {
        let top_axis = self.topology.dimensionality() - 1;
        self.write_sweep(set, transformation, top_axis, 0)
    }

    /// Writes every transformation of `set`: value orders with the highest
    /// axis outermost, axis orders innermost.
    pub fn write_transformations(&mut self, set: &[Value]) -> io::Result<()> {
        let mut transformation = Transformation::identity(self.topology.dimensionality());
        let top_axis = self.topology.dimensionality() - 1;
        self.write_value_orders(set, top_axis, &mut transformation)
    }

    fn write_value_orders(&mut self, set: &[Value], axis: usize, transformation: &mut Transformation) -> io::Result<()> {
        let topology = self.topology;
        for value_order in 0..factorial(topology.side_length()) {
            transformation.value_orders[axis] = value_order;
            if axis > 0 {
                self.write_value_orders(set, axis - 1, transformation)?;
                continue;
            }
            for axis_order in 0..factorial(topology.dimensionality()) {
                transformation.axis_order = axis_order;
                self.write_grid(set, transformation)?;
            }
        }
        Ok(())
    }

    fn write_sweep(&mut self, set: &[Value], transformation: &Transformation, axis: usize, offset: usize) -> io::Result<()> {
        let topology = self.topology;
        let permutations = topology.permutations();
        let role = permutations.permutation(transformation.axis_order)[axis] as usize;
        let scale = topology.scales()[role];
        let order = &permutations.permutation(transformation.value_orders[axis])[..topology.side_length()];

        for &position in order {
            let cell = offset + scale * position as usize;
            if axis == 0 {
                write!(self.out, "{}\t", set[topology.set_coordinate(cell)])?;
            } else {
                self.write_sweep(set, transformation, axis - 1, cell)?;
            }
        }
        writeln!(self.out)
    }
}

impl<W: Write> SolutionSink for GridPrinter<'_, W> {
    fn accept(&mut self, set: &[Value]) -> Result<()> {
        match self.mode {
            PrintMode::All => self.write_transformations(set)?,
            PrintMode::Identities => self.write_grid(set, &Transformation::identity(self.topology.dimensionality()))?,
            PrintMode::None => {}
        }
        Ok(())
    }
}

/// Sink that drops every solution.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl SolutionSink for Discard {
    fn accept(&mut self, _set: &[Value]) -> Result<()> {
        Ok(())
    }
}
