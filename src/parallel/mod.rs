mod angle;
mod detect;
mod io;

use std::io::Write;

use anyhow::Result;
use geo::LineString;
use serde_json::{json, Map};

use crate::common::write_atomic;
use crate::config::ParallelConfig;

pub use angle::{orientation_deg, reproject_to_web_mercator, WEB_MERCATOR_PROJ4, WEB_MERCATOR_URN, WGS84_PROJ4};
pub use detect::{find_parallel_pairs, has_parallel_flags, is_parallel};
pub use io::{read_lines_from_geojson_bytes, read_lines_from_geojson_file, write_lines_to_geojson_bytes, LineFeature};

/// Result of comparing every pair of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelReport {
    /// Undirected orientation per line, degrees in [0, 180).
    pub angles: Vec<f64>,
    pub pairs: Vec<(usize, usize)>,
    pub has_parallel: Vec<bool>,
}

impl ParallelReport {
    /// Indices of lines with at least one parallel partner.
    pub fn parallel_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.has_parallel.iter().enumerate().filter(|(_, p)| **p).map(|(i, _)| i)
    }

    /// Indices of lines without any parallel partner.
    pub fn lone_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.has_parallel.iter().enumerate().filter(|(_, p)| !**p).map(|(i, _)| i)
    }

    /// Print both groups with their angles.
    pub fn write_summary(&self, writer: &mut impl Write) -> Result<()> {
        writeln!(writer, "Lines with parallels detected:")?;
        writeln!(writer, "{:>6}  {:>12}", "index", "angle")?;
        for i in self.parallel_indices() {
            writeln!(writer, "{i:>6}  {:>12.6}", self.angles[i])?;
        }

        writeln!(writer)?;
        writeln!(writer, "Lines without parallels:")?;
        writeln!(writer, "{:>6}  {:>12}", "index", "angle")?;
        for i in self.lone_indices() {
            writeln!(writer, "{i:>6}  {:>12.6}", self.angles[i])?;
        }
        Ok(())
    }
}

/// Compare the orientation of every pair of (already projected) lines.
pub fn detect_parallel_lines(lines: &[LineString<f64>], tolerance_deg: f64) -> ParallelReport {
    let angles = lines.iter().map(orientation_deg).collect::<Vec<_>>();
    let pairs = find_parallel_pairs(&angles, tolerance_deg);
    let has_parallel = has_parallel_flags(angles.len(), &pairs);
    ParallelReport { angles, pairs, has_parallel }
}

/// Read, reproject, compare, and write the augmented GeoJSON.
pub fn run_parallel(config: &ParallelConfig) -> Result<ParallelReport> {
    let features = read_lines_from_geojson_file(&config.input)?;
    log::info!("[parallel] {} line(s) from {}", features.len(), config.input.display());

    let geographic = features.iter().map(|f| f.line.clone()).collect::<Vec<_>>();
    let projected = reproject_to_web_mercator(&geographic)?;

    let report = detect_parallel_lines(&projected, config.tolerance_deg);
    log::info!(
        "[parallel] {} pair(s) within {}°, {} of {} line(s) flagged",
        report.pairs.len(),
        config.tolerance_deg,
        report.parallel_indices().count(),
        report.angles.len(),
    );

    let extra = report.angles.iter().zip(&report.has_parallel)
        .map(|(angle, flag)| Map::from_iter([
            ("angle".to_string(), json!(angle)),
            ("has_parallel".to_string(), json!(flag)),
        ]))
        .collect::<Vec<_>>();
    let bytes = write_lines_to_geojson_bytes(&features, &projected, &extra, WEB_MERCATOR_URN)?;

    write_atomic(&config.output, &bytes)?;
    log::info!("[parallel] wrote {}", config.output.display());

    Ok(report)
}
