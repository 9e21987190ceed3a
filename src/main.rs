use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rust_gpx_reducer::{DistanceFunction, NearPointOptions, OutlierOptions};

mod batch_processor;

use batch_processor::{run_batch_reduction, ReductionSettings};

/// Thin every GPX track in a folder and summarise what is left.
#[derive(Parser, Debug)]
#[command(name = "rust-gpx-reducer", version, about)]
struct Args {
    /// Folder searched recursively for .gpx files
    folder: PathBuf,

    /// Summary CSV, one row per file
    #[arg(short, long, default_value = "reduction_summary.csv")]
    output: PathBuf,

    /// Drop points closer than this to the point before them in the track (metres)
    #[arg(long, default_value_t = 1.0)]
    near_threshold: f64,

    /// Drop points farther than this from the next point, repeated until none remain (metres)
    #[arg(long, default_value_t = 50.0)]
    outlier_threshold: f64,

    /// Distance metric: haversine or vincenty
    #[arg(short = 'd', long, default_value = "haversine")]
    distance_function: DistanceFunction,

    /// Grid cell edge (metres)
    #[arg(long, default_value_t = 100.0)]
    grid_spacing: f64,

    /// Flag fixes farther than this many DRMS from the centroid
    #[arg(long, default_value_t = 2.0)]
    spread_factor: f64,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Also write the reduced tracks as GPX into this folder
    #[arg(long)]
    gpx_output_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or_else(num_cpus::get))
        .build_global()?;

    let near = NearPointOptions {
        threshold: args.near_threshold,
        distance_function: args.distance_function,
        ..NearPointOptions::default()
    };
    near.validate()?;

    let outlier = OutlierOptions {
        threshold: args.outlier_threshold,
        distance_function: args.distance_function,
        ..OutlierOptions::default()
    };
    outlier.validate()?;

    let settings = ReductionSettings {
        near,
        outlier,
        grid_spacing_m: args.grid_spacing,
        spread_factor: args.spread_factor,
        gpx_output_dir: args.gpx_output_dir,
    };

    if !args.folder.is_dir() {
        return Err(format!("Not a folder: {}", args.folder.display()).into());
    }

    run_batch_reduction(&args.folder, &args.output, &settings)?;
    Ok(())
}
