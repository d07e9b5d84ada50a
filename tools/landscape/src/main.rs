/// Synthetic elevation generator: writes an N×N integer grid in the format
/// read by `rainfall`.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rainfall_core::landscape::synthetic::{fbm_landscape, uniform_landscape};
use rainfall_core::write_landscape;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Smooth rolling terrain from layered Perlin noise.
    Fbm,
    /// Independent random height per point.
    Uniform,
}

#[derive(Parser, Debug)]
#[command(name = "landscape", about = "Generate a synthetic N×N elevation file")]
struct Args {
    /// Grid dimension N.
    size: usize,

    /// Output elevation file.
    output: PathBuf,

    #[arg(short, long, value_enum, default_value = "fbm")]
    kind: Kind,

    /// Highest elevation in the generated grid.
    #[arg(short, long, default_value = "100")]
    relief: i32,

    #[arg(short, long, default_value = "42")]
    seed: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let grid = match args.kind {
        Kind::Fbm => fbm_landscape(args.size, args.relief, args.seed),
        Kind::Uniform => uniform_landscape(args.size, args.relief, args.seed as u64),
    };
    log::debug!("generated {:?} landscape {}×{} seed {}", args.kind, args.size, args.size, args.seed);

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    write_landscape(&mut out, &grid).context("writing elevation grid")?;
    out.flush()?;

    eprintln!("Wrote {}×{} {:?} landscape to {}", args.size, args.size, args.kind, args.output.display());
    Ok(())
}
