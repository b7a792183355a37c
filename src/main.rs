//! Magic Hypercube Generator
//!
//! Enumerates every magic hypercube of a given side length and
//! dimensionality, up to the symmetries the generator reconstructs on
//! output, and writes them as tab-separated grids.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::fmt::SubscriberBuilder;

use magic_hypercubes::generator::DEFAULT_OUTPUT;
use magic_hypercubes::topology::Topology;
use magic_hypercubes::{Generator, PrintMode};

/// Enumerates magic hypercubes and writes them to a text file.
#[derive(Parser)]
#[command(name = "magic-hypercubes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Shape {
    /// Number of cells along each axis.
    #[arg(short = 'n', long)]
    side_length: usize,
    /// Number of axes (2 = square, 3 = cube, ...).
    #[arg(short, long)]
    dimensionality: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Count then generate all magic hypercubes.
    Generate {
        #[command(flatten)]
        shape: Shape,
        /// Which grids to write for each solution found.
        #[arg(short, long, value_enum, default_value_t = PrintArg::Identities)]
        print: PrintArg,
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Value fixed at the origin cell.
        #[arg(long, default_value_t = Generator::DEFAULT_ORIGIN_VALUE)]
        origin: i64,
        /// Disable periodic progress lines.
        #[arg(short, long)]
        quiet: bool,
    },
    /// Count axis solidification sets only.
    Count {
        #[command(flatten)]
        shape: Shape,
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the segment chain the search walks.
    Segments {
        #[command(flatten)]
        shape: Shape,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PrintArg {
    /// Every symmetric variant of every solution.
    All,
    /// One canonical grid per solution.
    Identities,
    /// Count only.
    None,
}

impl From<PrintArg> for PrintMode {
    fn from(arg: PrintArg) -> Self {
        match arg {
            PrintArg::All => PrintMode::All,
            PrintArg::Identities => PrintMode::Identities,
            PrintArg::None => PrintMode::None,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            shape,
            print,
            output,
            origin,
            quiet,
        } => run_generate(&shape, print.into(), &output, origin, quiet),
        Command::Count { shape, quiet } => run_count(&shape, quiet),
        Command::Segments { shape } => run_segments(&shape),
    }
}

/// Runs both passes and prints the totals.
fn run_generate(shape: &Shape, mode: PrintMode, output: &Path, origin: i64, quiet: bool) -> Result<()> {
    let generator = Generator::new(shape.side_length, shape.dimensionality)?
        .with_origin_value(origin)?
        .with_progress(!quiet);

    let report = generator.generate_to_file(mode, output)?;

    println!("Total axis solidification sets: {}", report.axis_solidification_sets);
    println!("Cube identities: {}", report.cube_identities);
    println!("Cubes: {}", report.total_cubes);
    if mode != PrintMode::None {
        println!("Wrote {}", output.display());
    }
    Ok(())
}

fn run_count(shape: &Shape, quiet: bool) -> Result<()> {
    let generator = Generator::new(shape.side_length, shape.dimensionality)?.with_progress(!quiet);
    let count = generator.count_axis_solidification_sets()?;
    println!("Total axis solidification sets: {}", count);
    Ok(())
}

fn run_segments(shape: &Shape) -> Result<()> {
    let topology = Topology::new(shape.side_length, shape.dimensionality)?;
    print!("{}", describe_segments(&topology));
    Ok(())
}

/// One line per segment: id, kind, cells, complement and cross-checks.
fn describe_segments(topology: &Topology) -> String {
    let mut output = format!(
        "Magic constant {}, {} cells, {} segments\n",
        topology.magic_constant(),
        topology.set_size(),
        topology.segments().len()
    );
    let described = topology
        .segments()
        .iter()
        .enumerate()
        .map(|(id, segment)| (id.to_string(), segment))
        .chain(topology.forced_segment().map(|s| ("forced".to_string(), s)));

    for (label, segment) in described {
        let kind = if segment.is_axis { "axis" } else { "regular" };
        output.push_str(&format!(
            "{label}: {kind} {}..{} complement {:?}",
            segment.start,
            segment.end(),
            segment.sum_complement
        ));
        if !segment.sum_checks.is_empty() {
            output.push_str(&format!(" checks {:?}", segment.sum_checks));
        }
        output.push('\n');
    }
    output
}
