use anyhow::{anyhow, Context, Result};
use geo::{Coord, LineString, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// Geographic WGS84, the CRS GeoJSON coordinates are given in.
pub const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Spherical web Mercator (EPSG:3857).
pub const WEB_MERCATOR_PROJ4: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +units=m +no_defs +type=crs";

pub const WEB_MERCATOR_URN: &str = "urn:ogc:def:crs:EPSG::3857";

/// Reproject lon/lat lines to web Mercator meters.
pub fn reproject_to_web_mercator(lines: &[LineString<f64>]) -> Result<Vec<LineString<f64>>> {
    let from = Proj4::from_proj_string(WGS84_PROJ4)
        .with_context(|| anyhow!("failed to build source PROJ.4: {WGS84_PROJ4}"))?;
    let to = Proj4::from_proj_string(WEB_MERCATOR_PROJ4)
        .with_context(|| anyhow!("failed to build target PROJ.4: {WEB_MERCATOR_PROJ4}"))?;

    // Degrees → radians in, meters out.
    lines.iter()
        .map(|line| line.try_map_coords(|coord: Coord<f64>| -> Result<Coord<f64>> {
            let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
            transform(&from, &to, &mut point)
                .with_context(|| format!("CRS transform failed at ({}, {})", coord.x, coord.y))?;
            Ok(Coord { x: point.0, y: point.1 })
        }))
        .collect()
}

/// Undirected orientation of a line in degrees, in [0, 180).
///
/// Only the first and last vertices are used.
pub fn orientation_deg(line: &LineString<f64>) -> f64 {
    let (Some(start), Some(end)) = (line.0.first(), line.0.last()) else {
        return f64::NAN;
    };
    (end.y - start.y).atan2(end.x - start.x).to_degrees().rem_euclid(180.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn orientation_ignores_direction() {
        let east = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        let west = line_string![(x: 1.0, y: 0.0), (x: 0.0, y: 0.0)];
        assert!(orientation_deg(&east).abs() < 1e-12);
        assert!(orientation_deg(&west).abs() < 1e-12);
    }

    #[test]
    fn orientation_uses_endpoints_only() {
        let bent = line_string![(x: 0.0, y: 0.0), (x: 5.0, y: -3.0), (x: 1.0, y: 1.0)];
        assert!((orientation_deg(&bent) - 45.0).abs() < 1e-9);
        let down_left = line_string![(x: 0.0, y: 0.0), (x: -1.0, y: -1.0)];
        assert!((orientation_deg(&down_left) - 45.0).abs() < 1e-9);
        let steep = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: -1.0)];
        assert!((orientation_deg(&steep) - 135.0).abs() < 1e-9);
    }

    #[test]
    fn web_mercator_of_known_points() {
        let lines = vec![line_string![(x: 0.0, y: 0.0), (x: 180.0, y: 0.0), (x: 0.0, y: 45.0)]];
        let projected = reproject_to_web_mercator(&lines).unwrap();
        let coords = &projected[0].0;

        assert!(coords[0].x.abs() < 1e-6 && coords[0].y.abs() < 1e-6);
        assert!((coords[1].x - 20_037_508.342789244).abs() < 1e-3);
        assert!((coords[2].y - 5_621_521.486192066).abs() < 1e-3);
    }
}
