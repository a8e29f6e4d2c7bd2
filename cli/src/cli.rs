use std::path::PathBuf;

use poimosaic::Side;

/// Tile mosaic and line-geometry CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "poimosaic", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Download tiles around a route, stitch them, and mark a POI beside the route
    Mosaic(MosaicArgs),

    /// Flag line features whose orientation matches another line's
    Parallel(ParallelArgs),
}

#[derive(clap::Args, Debug)]
pub struct MosaicArgs {
    /// JSON settings file; flags below override its values
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Route vertex as LON,LAT (repeat in travel order); replaces the configured route
    #[arg(long = "coord", value_name = "LON,LAT", value_parser = parse_coord, allow_hyphen_values = true)]
    pub coords: Vec<[f64; 2]>,

    /// Tile zoom level
    #[arg(short, long)]
    pub zoom: Option<u8>,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Tile image format, e.g. png, jpeg
    #[arg(long)]
    pub format: Option<String>,

    /// Imagery service API key
    #[arg(long, env = "HERE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for downloaded tiles, defaults to "tiles_output"
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub folder: Option<PathBuf>,

    /// Output image, defaults to "./mosaico_con_poi.png"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// POI position as a fraction of the route length
    #[arg(long)]
    pub fraction: Option<f64>,

    /// Side of the route for the POI (left or right)
    #[arg(long)]
    pub side: Option<Side>,

    /// POI distance from the route in meters
    #[arg(long)]
    pub offset_meters: Option<f64>,

    /// Font file for the POI label
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub font: Option<PathBuf>,

    /// Per-tile HTTP timeout in seconds (default: none)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ParallelArgs {
    /// Input GeoJSON with LineString features
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output GeoJSON, defaults to "./nodos_resultado.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Angle tolerance in degrees
    #[arg(short, long, default_value_t = 5.0)]
    pub tolerance: f64,
}

fn parse_coord(s: &str) -> Result<[f64; 2], String> {
    let (lon, lat) = s.split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got '{s}'"))?;
    let lon = lon.trim().parse::<f64>().map_err(|e| format!("bad longitude '{lon}': {e}"))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("bad latitude '{lat}': {e}"))?;
    Ok([lon, lat])
}
