use anyhow::{bail, Result};
use geo::{Coord, Line, LineString, Point};

/// A route polyline in raw (lon, lat) degree units.
///
/// Lengths and distances are planar, measured directly in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    line: LineString<f64>,
    length: f64,
}

#[inline]
fn segment_length(segment: &Line<f64>) -> f64 {
    let delta = segment.delta();
    delta.x.hypot(delta.y)
}

impl Route {
    /// Construct a route from at least two (lon, lat) coordinates.
    pub fn new(coords: &[Coord<f64>]) -> Result<Self> {
        if coords.len() < 2 {
            bail!("A route needs at least two coordinates, got {}", coords.len());
        }
        let line = LineString::from(coords.to_vec());
        let length = line.lines().map(|segment| segment_length(&segment)).sum();
        Ok(Self { line, length })
    }

    /// Total planar length.
    #[inline] pub fn length(&self) -> f64 { self.length }

    /// Point at `distance` along the route.
    ///
    /// Negative distances are measured back from the end. The result is
    /// clamped to the route's start and end points.
    pub fn interpolate(&self, distance: f64) -> Point<f64> {
        let mut remaining = if distance < 0.0 { self.length + distance } else { distance };

        if remaining <= 0.0 {
            return Point::from(self.line.0[0]);
        }

        for segment in self.line.lines() {
            let len = segment_length(&segment);
            if remaining <= len {
                let t = if len > 0.0 { remaining / len } else { 0.0 };
                return Point::from(segment.start + segment.delta() * t);
            }
            remaining -= len;
        }

        Point::from(self.line.0[self.line.0.len() - 1])
    }
}
