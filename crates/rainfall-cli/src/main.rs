/// Parallel rainfall simulation over an N×N elevation grid.
///
/// Prints the number of steps until all water is absorbed, the runtime, and
/// the absorbed-water grid.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rainfall_core::{run_simulation, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "rainfall", about = "Simulate rain trickling over an elevation grid until it is absorbed")]
struct Args {
    /// P: number of parallel workers (clamped to N).
    workers: usize,

    /// M: number of initial steps during which one drop falls on every point.
    rain_steps: u32,

    /// A: amount of water absorbed into the ground at a point per step.
    absorption: f32,

    /// N: dimension of the landscape (N×N).
    size: usize,

    /// File with N lines of N integer elevations.
    elevation_file: PathBuf,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SimConfig {
        workers: args.workers,
        rain_steps: args.rain_steps,
        absorption: args.absorption,
        size: args.size,
        elevation: args.elevation_file,
    };
    config.validate().context("invalid arguments")?;
    log::debug!("{config:?}");

    let report = run_simulation(&config)
        .with_context(|| format!("simulation of {} failed", config.elevation.display()))?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if args.json {
        report.write_json(&mut out).context("writing JSON report")?;
        writeln!(out)?;
    } else {
        report.write_text(&mut out).context("writing report")?;
    }
    out.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}
