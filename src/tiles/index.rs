use std::f64::consts::PI;
use std::fmt;

/// Latitude limit of the square web-Mercator world.
pub const MAX_LATITUDE: f64 = 85.05113;

/// A slippy-map tile address at some zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    pub x: u32,
    pub y: u32,
}

impl TileIndex {
    #[inline] pub fn new(x: u32, y: u32) -> Self { Self { x, y } }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{} y{}", self.x, self.y)
    }
}

#[inline]
fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Number of tiles along one axis at `zoom`.
#[inline]
fn tiles_per_axis(zoom: u8) -> f64 {
    2.0_f64.powi(zoom as i32)
}

/// Fractional tile coordinates of a lon/lat point (latitude clamped first).
pub fn fractional_tile(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
    let n = tiles_per_axis(zoom);
    let lat_rad = clamp_latitude(lat).to_radians();
    let x = (lon + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
    (x, y)
}

/// Tile covering (lat, lon) at `zoom`.
///
/// Longitude is not range-checked; values outside [-180, 180] produce
/// indices outside the world grid (negative ones saturate to zero).
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> TileIndex {
    let n = tiles_per_axis(zoom);
    let lat_rad = clamp_latitude(lat).to_radians();
    let lon_rad = lon.to_radians();
    let x = (lon_rad + PI) / (2.0 * PI) * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
    TileIndex { x: x.floor() as u32, y: y.floor() as u32 }
}

/// Inverse projection: (lat, lon) in degrees of a (possibly fractional) tile position.
/// Integer inputs give the tile's north-west corner.
pub fn tile_coords_to_lat_lon(x: f64, y: f64, zoom: u8) -> (f64, f64) {
    let n = tiles_per_axis(zoom);
    let lon = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    (lat, lon)
}

/// Pixel position of (lat, lon) inside a mosaic whose top-left tile is (x_min, y_min).
///
/// The result is not clamped to the mosaic bounds.
pub fn latlon_to_pixel(lat: f64, lon: f64, zoom: u8, x_min: u32, y_min: u32, tile_size: u32) -> (i32, i32) {
    let (x_tile, y_tile) = fractional_tile(lat, lon, zoom);
    let px = ((x_tile - x_min as f64) * tile_size as f64).floor() as i32;
    let py = ((y_tile - y_min as f64) * tile_size as f64).floor() as i32;
    (px, py)
}
