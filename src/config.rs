use std::{fmt, fs, path::{Path, PathBuf}, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Side of the route, relative to its direction of travel, on which the POI is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    /// Sign applied to the left-hand normal.
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(anyhow!("Unknown POI side '{other}' (expected 'left' or 'right')")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

impl Serialize for Side {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Placement of the point of interest relative to the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiConfig {
    /// Position along the route as a fraction of its length.
    pub fraction: f64,
    pub side: Side,
    /// Lateral distance from the route in meters.
    pub offset_meters: f64,
    pub label: String,
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            fraction: 0.5,
            side: Side::Right,
            offset_meters: 10.0,
            label: "POI".to_string(),
        }
    }
}

/// Settings for the tile mosaic pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    /// Route vertices as `[lon, lat]` pairs, in travel order.
    pub coordinates: Vec<[f64; 2]>,
    pub zoom: u8,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Image format requested from the service, also the tile file extension.
    pub tile_format: String,
    pub api_key: String,
    /// Directory receiving the downloaded tiles.
    pub folder: PathBuf,
    /// Final annotated image.
    pub output: PathBuf,
    pub poi: PoiConfig,
    /// HTTP timeout per tile request; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// TrueType/OpenType font for the POI label; common system fonts are tried when unset.
    pub font: Option<PathBuf>,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            coordinates: vec![
                [-99.63067, 19.26921],
                [-99.63059, 19.26927],
                [-99.63054, 19.27009],
                [-99.63052, 19.27025],
                [-99.63043, 19.27081],
            ],
            zoom: 16,
            tile_size: 512,
            tile_format: "png".to_string(),
            api_key: "<TU_API_KEY>".to_string(),
            folder: PathBuf::from("tiles_output"),
            output: PathBuf::from("mosaico_con_poi.png"),
            poi: PoiConfig::default(),
            timeout_secs: None,
            font: None,
        }
    }
}

impl MosaicConfig {
    /// Read a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Route vertices as `geo` coordinates (x = lon, y = lat).
    pub fn coords(&self) -> Vec<Coord<f64>> {
        self.coordinates.iter().map(|&[x, y]| Coord { x, y }).collect()
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.coordinates.len() < 2 {
            bail!("At least two route coordinates are required, got {}", self.coordinates.len());
        }
        if self.coordinates.iter().flatten().any(|v| !v.is_finite()) {
            bail!("Route coordinates must be finite numbers");
        }
        if self.zoom > 24 {
            bail!("Zoom level {} is out of range (0-24)", self.zoom);
        }
        if self.tile_size == 0 {
            bail!("Tile size must be positive");
        }
        if self.tile_format.is_empty() {
            bail!("Tile format must not be empty");
        }
        if !self.poi.fraction.is_finite() {
            bail!("POI fraction must be a finite number");
        }
        if !self.poi.offset_meters.is_finite() {
            bail!("POI offset must be a finite number");
        }
        Ok(())
    }
}

/// Settings for the parallel-line detector, filled from CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Maximum orientation difference in degrees for two lines to count as parallel.
    pub tolerance_deg: f64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("nodos.geoJson"),
            output: PathBuf::from("nodos_resultado.geojson"),
            tolerance_deg: 5.0,
        }
    }
}
