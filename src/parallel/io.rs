use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString};
use serde_json::{json, Map, Value};

/// A LineString feature read from GeoJSON, with its original JSON kept for write-back.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    pub line: LineString<f64>,
    pub feature: Value,
}

/// Parse a GeoJSON position list: [[x, y], [x, y, z], ...].
fn parse_line_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let points = coords.iter()
        .map(|position| {
            let pair = position.as_array()
                .filter(|p| p.len() >= 2)
                .ok_or_else(|| anyhow!("Invalid position: expected [x, y]"))?;
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString(points))
}

/// Read LineString features from GeoJSON bytes (a FeatureCollection).
pub fn read_lines_from_geojson_bytes(bytes: &[u8]) -> Result<Vec<LineFeature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("GeoJSON is not a FeatureCollection (missing `features` array)"))?;

    features.iter().enumerate()
        .map(|(idx, feature)| {
            let geometry = &feature["geometry"];
            match geometry["type"].as_str() {
                Some("LineString") => {}
                Some(other) => bail!("Feature {idx}: unsupported geometry type {other}, expected LineString"),
                None => bail!("Feature {idx}: missing geometry"),
            }
            let coords = geometry["coordinates"].as_array()
                .ok_or_else(|| anyhow!("Feature {idx}: LineString without coordinates"))?;
            let line = parse_line_coords(coords)
                .with_context(|| format!("Feature {idx}: bad coordinates"))?;
            if line.0.len() < 2 {
                bail!("Feature {idx}: LineString needs at least two positions, got {}", line.0.len());
            }
            Ok(LineFeature { line, feature: feature.clone() })
        })
        .collect()
}

/// Read LineString features from a GeoJSON file.
pub fn read_lines_from_geojson_file(path: &Path) -> Result<Vec<LineFeature>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read GeoJSON file: {}", path.display()))?;
    read_lines_from_geojson_bytes(&bytes)
        .with_context(|| format!("Failed to load lines from {}", path.display()))
}

/// Serialize features with replaced geometries and extra properties.
///
/// `lines[i]` and `extra[i]` belong to `features[i]`. `crs_name` is written as a
/// named-CRS member, e.g. `urn:ogc:def:crs:EPSG::3857`.
pub fn write_lines_to_geojson_bytes(
    features: &[LineFeature],
    lines: &[LineString<f64>],
    extra: &[Map<String, Value>],
    crs_name: &str,
) -> Result<Vec<u8>> {
    if lines.len() != features.len() || extra.len() != features.len() {
        bail!("[to_geojson] length mismatch: {} features, {} lines, {} property sets",
            features.len(), lines.len(), extra.len());
    }

    let features = features.iter().zip(lines).zip(extra)
        .map(|((feature, line), extra)| {
            let mut out = feature.feature.clone();
            let coordinates: Vec<Vec<f64>> = line.coords().map(|c| vec![c.x, c.y]).collect();
            out["geometry"] = json!({ "type": "LineString", "coordinates": coordinates });

            let mut properties = out["properties"].as_object().cloned().unwrap_or_default();
            properties.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
            out["properties"] = Value::Object(properties);
            out
        })
        .collect::<Vec<_>>();

    let feature_collection = json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": crs_name } },
        "features": features,
    });

    serde_json::to_vec_pretty(&feature_collection).context("Failed to serialize GeoJSON to bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LINES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "a" },
              "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1, 5]] } },
            { "type": "Feature", "properties": null,
              "geometry": { "type": "LineString", "coordinates": [[2, 0], [2, 3], [2, 4]] } }
        ]
    }"#;

    #[test]
    fn reads_line_strings() {
        let lines = read_lines_from_geojson_bytes(TWO_LINES.as_bytes()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line.0, vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]);
        assert_eq!(lines[1].line.0.len(), 3);
    }

    #[test]
    fn rejects_other_geometry_types() {
        let json = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [0, 0] } }
        ] }"#;
        let err = read_lines_from_geojson_bytes(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Point"));
    }

    #[test]
    fn rejects_single_position_lines() {
        let json = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": {}, "geometry": { "type": "LineString", "coordinates": [[0, 0]] } }
        ] }"#;
        assert!(read_lines_from_geojson_bytes(json.as_bytes()).is_err());
    }

    #[test]
    fn write_keeps_properties_and_adds_new_ones() {
        let features = read_lines_from_geojson_bytes(TWO_LINES.as_bytes()).unwrap();
        let lines: Vec<_> = features.iter().map(|f| f.line.clone()).collect();
        let extra: Vec<_> = (0..2)
            .map(|i| Map::from_iter([("has_parallel".to_string(), json!(i == 0))]))
            .collect();

        let bytes = write_lines_to_geojson_bytes(&features, &lines, &extra, "urn:ogc:def:crs:EPSG::3857").unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::3857");
        assert_eq!(value["features"][0]["properties"]["name"], "a");
        assert_eq!(value["features"][0]["properties"]["has_parallel"], true);
        assert_eq!(value["features"][1]["properties"]["has_parallel"], false);
        assert_eq!(value["features"][1]["geometry"]["coordinates"][2], json!([2.0, 4.0]));
    }

    #[test]
    fn write_checks_lengths() {
        let features = read_lines_from_geojson_bytes(TWO_LINES.as_bytes()).unwrap();
        assert!(write_lines_to_geojson_bytes(&features, &[], &[], "x").is_err());
    }
}
