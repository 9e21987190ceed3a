//! Folder-wide GPX reduction: thins every track, summarises it and writes
//! one CSV row per file.

use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use gpx::{read, write, Gpx, Waypoint};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use rust_gpx_reducer::gpx_track::waypoint_to_point;
use rust_gpx_reducer::{
    bounding_box_of, grid_size, near_point_removal, outlier_point_removal_multiple, ClusterSpread,
    FnLocator, NearPointOptions, OutlierOptions, Point,
};

#[derive(Debug, Clone)]
pub struct ReductionSettings {
    pub near: NearPointOptions,
    pub outlier: OutlierOptions,
    pub grid_spacing_m: f64,
    pub spread_factor: f64,
    pub gpx_output_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Clone)]
pub struct FileSummary {
    filename: String,
    original_points: usize,
    after_near_removal: usize,
    after_outlier_removal: usize,
    reduction_percent: f64,
    centroid_latitude: f64,
    centroid_longitude: f64,
    drms_m: f64,
    spread_outliers: usize,
    nw_latitude: f64,
    nw_longitude: f64,
    se_latitude: f64,
    se_longitude: f64,
    grid_rows: usize,
    grid_columns: usize,
}

/// All `.gpx` files below `folder`.
pub fn collect_gpx_files(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.eq_ignore_ascii_case("gpx"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

pub fn run_batch_reduction(
    folder: &Path,
    output_csv: &Path,
    settings: &ReductionSettings,
) -> Result<Vec<FileSummary>, Box<dyn std::error::Error>> {
    println!("\n📉 GPX TRACK REDUCTION");
    println!("======================");
    println!(
        "Near points: {:.1}m ({}), outliers: {:.1}m ({}), grid: {:.0}m",
        settings.near.threshold,
        settings.near.distance_function,
        settings.outlier.threshold,
        settings.outlier.distance_function,
        settings.grid_spacing_m
    );

    if let Some(dir) = &settings.gpx_output_dir {
        create_dir_all(dir)?;
    }

    let gpx_files = collect_gpx_files(folder);
    println!("📁 Found {} GPX files to process", gpx_files.len());
    println!("⚡ Using parallel processing on {} threads", rayon::current_num_threads());

    let start_time = std::time::Instant::now();
    let processed_count = AtomicUsize::new(0);
    let total_files = gpx_files.len();

    let mut results: Vec<FileSummary> = gpx_files
        .par_iter()
        .filter_map(|gpx_path| match process_single_gpx(gpx_path, settings) {
            Ok(summary) => {
                let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                println!(
                    "  [{}/{}] {}: {} → {} points",
                    count, total_files, summary.filename, summary.original_points, summary.after_outlier_removal
                );
                Some(summary)
            }
            Err(e) => {
                eprintln!("❌ Error processing {:?}: {}", gpx_path, e);
                tracing::warn!(path = %gpx_path.display(), error = %e, "skipping file");
                None
            }
        })
        .collect();
    results.sort_by(|a, b| a.filename.cmp(&b.filename));

    write_summary_csv(&results, output_csv)?;

    let elapsed = start_time.elapsed();
    println!("\n✅ REDUCTION COMPLETE!");
    println!("📊 Processed {} files in {:.2} seconds", results.len(), elapsed.as_secs_f64());
    println!("📄 Summary CSV saved to: {}", output_csv.display());
    print_reduction_summary(&results);

    Ok(results)
}

fn process_single_gpx(
    gpx_path: &Path,
    settings: &ReductionSettings,
) -> Result<FileSummary, Box<dyn std::error::Error>> {
    let file = File::open(gpx_path)?;
    let mut gpx = read(BufReader::new(file))?;

    let locator = FnLocator::new("trkpt", |w: &Waypoint| Some(waypoint_to_point(w)));
    let mut original_points = 0;
    let mut after_near_removal = 0;
    let mut retained: Vec<Point> = Vec::new();

    // Segments are separate recordings; each is thinned on its own.
    for track in &mut gpx.tracks {
        for segment in &mut track.segments {
            original_points += segment.points.len();
            let near = near_point_removal(&segment.points, &settings.near, &locator)?;
            after_near_removal += near.len();
            let reduced = outlier_point_removal_multiple(&near, &settings.outlier, &locator)?;
            retained.extend(reduced.iter().map(waypoint_to_point));
            segment.points = reduced;
        }
    }

    if retained.is_empty() {
        return Err("No track points found".into());
    }

    let spread = ClusterSpread::analyze(&retained, settings.spread_factor)?;
    let bbox = bounding_box_of(&retained)?;
    let grid = grid_size(
        bbox.nw.latitude,
        bbox.nw.longitude,
        bbox.se.latitude,
        bbox.se.longitude,
        settings.grid_spacing_m,
    )?;

    let filename = gpx_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    if let Some(dir) = &settings.gpx_output_dir {
        write_reduced_gpx(&gpx, &dir.join(&filename))?;
    }

    Ok(FileSummary {
        filename,
        original_points,
        after_near_removal,
        after_outlier_removal: retained.len(),
        reduction_percent: (1.0 - retained.len() as f64 / original_points as f64) * 100.0,
        centroid_latitude: spread.center.latitude,
        centroid_longitude: spread.center.longitude,
        drms_m: spread.drms,
        spread_outliers: spread.outliers.len(),
        nw_latitude: bbox.nw.latitude,
        nw_longitude: bbox.nw.longitude,
        se_latitude: bbox.se.latitude,
        se_longitude: bbox.se.longitude,
        grid_rows: grid.rows,
        grid_columns: grid.columns,
    })
}

fn write_reduced_gpx(gpx: &Gpx, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    write(gpx, BufWriter::new(file))?;
    Ok(())
}

fn write_summary_csv(results: &[FileSummary], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_reduction_summary(results: &[FileSummary]) {
    if results.is_empty() {
        println!("⚠️  No files were processed");
        return;
    }

    let original: usize = results.iter().map(|r| r.original_points).sum();
    let retained: usize = results.iter().map(|r| r.after_outlier_removal).sum();
    let near_removed: usize = results.iter().map(|r| r.original_points - r.after_near_removal).sum();
    let outliers_removed: usize = results
        .iter()
        .map(|r| r.after_near_removal - r.after_outlier_removal)
        .sum();

    println!("\n📊 REDUCTION SUMMARY");
    println!("  Points in:            {}", original);
    println!("  Near points removed:  {}", near_removed);
    println!("  Outliers removed:     {}", outliers_removed);
    println!(
        "  Points out:           {} ({:.1}% reduction)",
        retained,
        (1.0 - retained as f64 / original as f64) * 100.0
    );

    let mut widest: Vec<&FileSummary> = results.iter().collect();
    widest.sort_by(|a, b| b.drms_m.total_cmp(&a.drms_m));
    println!("\n🗺️  Largest spread (DRMS):");
    for r in widest.iter().take(5) {
        println!(
            "  {:<40} {:>10.0}m  ({} x {} grid cells)",
            r.filename, r.drms_m, r.grid_rows, r.grid_columns
        );
    }
}
