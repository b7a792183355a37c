//! The public entry point: build the topology once, then run the counting
//! pass followed by the generation pass.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{GeneratorError, Result};
use crate::grid::Value;
use crate::output::{Discard, GridPrinter, PrintMode};
use crate::progress::{format_elapsed, with_reporter, ProgressCounters};
use crate::solver::{initial_set, Pass, Search};
use crate::topology::Topology;
use crate::SolutionSink;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "Magic Cubes.txt";

/// Totals from one call to [`Generator::generate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub axis_solidification_sets: u64,
    pub traversed_axis_solidification_sets: u64,
    /// Transformationally distinct solutions.
    pub cube_identities: u64,
    /// All solutions including symmetric variants (saturating).
    pub total_cubes: u128,
}

/// Magic hypercube generator for one (side length, dimensionality).
#[derive(Clone, Debug)]
pub struct Generator {
    topology: Topology,
    origin_value: Value,
    report_progress: bool,
}

impl Generator {
    pub const DEFAULT_ORIGIN_VALUE: Value = 1;

    /// Builds the topology; fails fast on out-of-range input.
    pub fn new(side_length: usize, dimensionality: usize) -> Result<Self> {
        Ok(Self {
            topology: Topology::new(side_length, dimensionality)?,
            origin_value: Self::DEFAULT_ORIGIN_VALUE,
            report_progress: true,
        })
    }

    /// Sets the value fixed at the origin before searching.
    pub fn with_origin_value(mut self, origin_value: Value) -> Result<Self> {
        let set_size = self.topology.set_size();
        if !(1..=set_size as Value).contains(&origin_value) {
            return Err(GeneratorError::InvalidOriginValue {
                value: origin_value,
                set_size,
            });
        }
        self.origin_value = origin_value;
        Ok(self)
    }

    /// Enables or disables the background progress reporter.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn origin_value(&self) -> Value {
        self.origin_value
    }

    /// Runs only the counting pass.
    pub fn count_axis_solidification_sets(&self) -> Result<u64> {
        let counters = ProgressCounters::new();
        let mut set = self.initial_set();
        self.run_pass(Pass::Counting, &mut set, &counters, &mut Discard)?;
        Ok(counters.snapshot().axis_sets_counted)
    }

    /// Runs both passes and writes solutions to `path` in `mode`.
    ///
    /// The file is created even when `mode` is [`PrintMode::None`].
    pub fn generate_to_file(&self, mode: PrintMode, path: impl AsRef<Path>) -> Result<GenerationReport> {
        let file = File::create(path.as_ref())?;
        info!(path = %path.as_ref().display(), ?mode, "writing magic hypercubes");
        self.generate(mode, BufWriter::new(file))
    }

    /// Runs both passes and writes solutions to `out` in `mode`.
    pub fn generate<W: Write>(&self, mode: PrintMode, out: W) -> Result<GenerationReport> {
        let mut printer = GridPrinter::new(&self.topology, mode, out);
        let report = self.generate_with_sink(&mut printer)?;
        printer.finish()?;
        Ok(report)
    }

    /// Runs both passes, handing each canonical solution to `sink`.
    ///
    /// Both passes share one set buffer: the generation pass starts from the
    /// arrangement the counting pass leaves behind, which decides the
    /// representative written for each solution and their order.
    pub fn generate_with_sink<S: SolutionSink + ?Sized>(&self, sink: &mut S) -> Result<GenerationReport> {
        let counters = ProgressCounters::new();
        let mut set = self.initial_set();

        info!("counting axis solidification sets");
        let elapsed = self.run_pass(Pass::Counting, &mut set, &counters, &mut Discard)?;
        let counted = counters.snapshot().axis_sets_counted;
        info!(total = counted, elapsed = %format_elapsed(elapsed), "counted axis solidification sets");

        info!("generating magic hypercubes");
        let elapsed = self.run_pass(Pass::Generating, &mut set, &counters, sink)?;
        let snapshot = counters.snapshot();
        let report = GenerationReport {
            axis_solidification_sets: snapshot.axis_sets_counted,
            traversed_axis_solidification_sets: snapshot.axis_sets_traversed,
            cube_identities: snapshot.cube_identities,
            total_cubes: (snapshot.cube_identities as u128)
                .saturating_mul(self.topology.transformations_per_identity()),
        };
        info!(
            cube_identities = report.cube_identities,
            cubes = report.total_cubes,
            elapsed = %format_elapsed(elapsed),
            "generated magic hypercubes"
        );

        Ok(report)
    }

    fn initial_set(&self) -> Vec<Value> {
        initial_set(self.topology.set_size(), self.origin_value)
    }

    fn run_pass<S: SolutionSink + ?Sized>(
        &self,
        pass: Pass,
        set: &mut Vec<Value>,
        counters: &ProgressCounters,
        sink: &mut S,
    ) -> Result<std::time::Duration> {
        let started = std::time::Instant::now();
        with_reporter(counters, pass, self.report_progress, || {
            Search::new(&self.topology, pass, counters, sink).run(set)
        })?;
        Ok(started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::is_magic;
    use rustc_hash::FxHashSet;

    fn quiet(side_length: usize, dimensionality: usize) -> Generator {
        Generator::new(side_length, dimensionality).unwrap().with_progress(false)
    }

    fn generate_text(generator: &Generator, mode: PrintMode) -> (GenerationReport, String) {
        let mut out = Vec::new();
        let report = generator.generate(mode, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_known_totals() {
        let cases = [
            (3, 2, 1, 1, 72),
            (3, 3, 35, 4, 5184),
            (4, 2, 67, 477, 549_504),
            (2, 2, 0, 0, 0),
            (2, 3, 0, 0, 0),
        ];
        for (side_length, dimensionality, axis_sets, identities, cubes) in cases {
            let (report, _) = generate_text(&quiet(side_length, dimensionality), PrintMode::None);
            assert_eq!(report.axis_solidification_sets, axis_sets, "({side_length}, {dimensionality})");
            assert_eq!(report.traversed_axis_solidification_sets, axis_sets);
            assert_eq!(report.cube_identities, identities);
            assert_eq!(report.total_cubes, cubes);
        }
    }

    #[test]
    fn test_count_only() {
        assert_eq!(quiet(3, 3).count_axis_solidification_sets().unwrap(), 35);
        assert_eq!(quiet(4, 2).count_axis_solidification_sets().unwrap(), 67);
    }

    #[test]
    fn test_count_only_in_four_dimensions() {
        assert_eq!(quiet(3, 4).count_axis_solidification_sets().unwrap(), 4845);
    }

    #[test]
    fn test_none_mode_counts_without_output() {
        let (report, text) = generate_text(&quiet(3, 2), PrintMode::None);
        assert_eq!(report.cube_identities, 1);
        assert!(text.is_empty());
    }

    #[test]
    fn test_all_mode_writes_distinct_magic_squares() {
        let (report, text) = generate_text(&quiet(3, 2), PrintMode::All);
        let grids: Vec<&str> = text.split("\n\n").filter(|g| !g.is_empty()).collect();
        assert_eq!(grids.len() as u128, report.total_cubes);
        let distinct: FxHashSet<&str> = grids.iter().copied().collect();
        assert_eq!(distinct.len(), 72);
        for grid in grids {
            let values: Vec<Value> = grid.split_whitespace().map(|v| v.parse().unwrap()).collect();
            assert!(is_magic(&values, 3, 2));
        }
    }

    #[test]
    fn test_square_of_four_first_and_last_identity() {
        let (_, text) = generate_text(&quiet(4, 2), PrintMode::Identities);
        let grids: Vec<&str> = text.split("\n\n").filter(|g| !g.is_empty()).collect();
        assert_eq!(grids.len(), 477);
        assert_eq!(grids[0], "1\t4\t16\t13\t\n10\t11\t6\t7\t\n15\t14\t3\t2\t\n8\t5\t9\t12\t");
        assert_eq!(grids[476], "1\t16\t6\t11\t\n13\t3\t14\t4\t\n5\t7\t12\t10\t\n15\t8\t2\t9\t");
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = quiet(3, 3);
        let (_, first) = generate_text(&generator, PrintMode::Identities);
        let (_, second) = generate_text(&generator, PrintMode::Identities);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_progress_reporting_does_not_change_results() {
        let (with_progress, _) = generate_text(&Generator::new(3, 3).unwrap(), PrintMode::None);
        let (without_progress, _) = generate_text(&quiet(3, 3), PrintMode::None);
        assert_eq!(with_progress, without_progress);
    }

    #[test]
    fn test_single_cell_grid() {
        let (report, text) = generate_text(&quiet(1, 2), PrintMode::Identities);
        assert_eq!(report.cube_identities, 1);
        assert_eq!(report.axis_solidification_sets, 1);
        assert_eq!(text, "1\t\n\n");
    }

    #[test]
    fn test_generate_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        let report = quiet(3, 2).generate_to_file(PrintMode::Identities, &path).unwrap();
        assert_eq!(report.cube_identities, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1\t9\t5\t\n8\t4\t3\t\n6\t2\t7\t\n\n");
    }

    #[test]
    fn test_unwritable_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let result = quiet(3, 2).generate_to_file(PrintMode::Identities, &path);
        assert!(matches!(result, Err(GeneratorError::Io(_))));
    }

    #[test]
    fn test_origin_value_validation() {
        assert!(matches!(
            quiet(3, 2).with_origin_value(0),
            Err(GeneratorError::InvalidOriginValue { value: 0, set_size: 9 })
        ));
        assert!(quiet(3, 2).with_origin_value(10).is_err());
        assert_eq!(quiet(3, 2).with_origin_value(9).unwrap().origin_value(), 9);
    }

    #[test]
    fn test_other_origin_values_yield_magic_squares() {
        let generator = quiet(3, 2).with_origin_value(5).unwrap();
        let mut grids = Vec::new();
        let mut collect = |set: &[Value]| -> Result<()> {
            grids.push(generator.topology().to_cube_order(set));
            Ok(())
        };
        let report = generator.generate_with_sink(&mut collect).unwrap();
        assert_eq!(report.axis_solidification_sets, 6);
        assert_eq!(report.cube_identities, 1);
        assert_eq!(grids, vec![vec![5, 7, 3, 9, 2, 4, 1, 6, 8]]);
        assert!(is_magic(&grids[0], 3, 2));
    }

    #[test]
    fn test_sink_errors_propagate() {
        let generator = quiet(3, 2);
        let mut failing = |_: &[Value]| -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        };
        assert!(matches!(generator.generate_with_sink(&mut failing), Err(GeneratorError::Io(_))));
    }
}
