use anyhow::{bail, Context, Result};
use geo::{Coord, Point};

use crate::config::Side;
use crate::route::Route;

/// Approximate meters per degree, valid near the equator over short distances.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Half-width of the window used to estimate the route's local direction.
pub const TANGENT_WINDOW: f64 = 0.0001;

/// A point of interest placed beside a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poi {
    /// Point on the route the POI is offset from.
    pub base: Point<f64>,
    /// Unit normal pointing to the left of the direction of travel.
    pub normal: Coord<f64>,
    /// Final (lon, lat) position.
    pub position: Point<f64>,
}

/// Convert a distance in meters to degrees with the flat-earth constant.
#[inline]
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Unit left-hand normal of the route at `distance`, from points `TANGENT_WINDOW` before and after it.
pub fn local_normal(route: &Route, distance: f64) -> Result<Coord<f64>> {
    let p1 = route.interpolate(distance - TANGENT_WINDOW);
    let p2 = route.interpolate(distance + TANGENT_WINDOW);
    let dx = p2.x() - p1.x();
    let dy = p2.y() - p1.y();
    let norm = dx.hypot(dy);

    if norm == 0.0 || !norm.is_finite() {
        bail!(
            "Degenerate tangent at distance {distance} along a route of length {} (tangent window collapsed to a point)",
            route.length()
        );
    }

    Ok(Coord { x: -dy / norm, y: dx / norm })
}

/// Place a POI at `fraction` of the route length, `offset_meters` to the given side.
pub fn place_poi(route: &Route, fraction: f64, side: Side, offset_meters: f64) -> Result<Poi> {
    let distance = fraction * route.length();
    let base = route.interpolate(distance);
    let normal = local_normal(route, distance)
        .with_context(|| format!("No direction for a POI at fraction {fraction}"))?;

    let offset = side.factor() * meters_to_degrees(offset_meters);
    let position = Point::new(base.x() + normal.x * offset, base.y() + normal.y * offset);

    log::debug!("[poi] base=({:.7}, {:.7}) normal=({:.4}, {:.4}) side={side}", base.x(), base.y(), normal.x, normal.y);
    Ok(Poi { base, normal, position })
}
