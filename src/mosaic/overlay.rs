use std::{fs, path::Path};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut};

const MARKER_RADIUS: i32 = 5;
const MARKER_FILL: Rgb<u8> = Rgb([255, 0, 0]);
const MARKER_OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

const ROUTE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const ROUTE_WIDTH: i32 = 2;

const POI_RADIUS: i32 = 6;
const POI_FILL: Rgb<u8> = Rgb([0, 0, 255]);
const POI_OUTLINE: Rgb<u8> = Rgb([255, 255, 255]);

const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_OFFSET: (i32, i32) = (8, -10);
const LABEL_SCALE: f32 = 14.0;

/// Fonts tried, in order, when no label font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Filled circle with a one-pixel outline.
fn draw_marker(image: &mut RgbImage, center: (i32, i32), radius: i32, fill: Rgb<u8>, outline: Rgb<u8>) {
    draw_filled_circle_mut(image, center, radius, fill);
    draw_hollow_circle_mut(image, center, radius, outline);
}

/// Open polyline through `points`, `width` pixels thick.
fn draw_polyline(image: &mut RgbImage, points: &[(i32, i32)], color: Rgb<u8>, width: i32) {
    let (lo, hi) = (-(width - 1) / 2, width / 2);
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        // Thicken across the minor axis of the segment.
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        for k in lo..=hi {
            let (kx, ky) = if steep { (k, 0) } else { (0, k) };
            draw_line_segment_mut(
                image,
                ((x0 + kx) as f32, (y0 + ky) as f32),
                ((x1 + kx) as f32, (y1 + ky) as f32),
                color,
            );
        }
    }
}

/// Draw route markers at every vertex and the connecting polyline.
pub fn draw_route(image: &mut RgbImage, pixels: &[(i32, i32)]) {
    for &pixel in pixels {
        draw_marker(image, pixel, MARKER_RADIUS, MARKER_FILL, MARKER_OUTLINE);
    }
    draw_polyline(image, pixels, ROUTE_COLOR, ROUTE_WIDTH);
}

/// Draw the POI marker and, when a font is available, its label.
pub fn draw_poi(image: &mut RgbImage, pixel: (i32, i32), label: &str, font: Option<&FontVec>) {
    draw_marker(image, pixel, POI_RADIUS, POI_FILL, POI_OUTLINE);

    if let Some(font) = font {
        if !label.is_empty() {
            let (x, y) = (pixel.0 + LABEL_OFFSET.0, pixel.1 + LABEL_OFFSET.1);
            draw_text_mut(image, LABEL_COLOR, x, y, PxScale::from(LABEL_SCALE), font, label);
        }
    }
}

fn read_font(path: &Path) -> Result<FontVec> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read font file {}", path.display()))?;
    FontVec::try_from_vec(bytes)
        .with_context(|| format!("Invalid font file {}", path.display()))
}

/// Load the label font: the configured one (errors are fatal), else the first usable system font.
pub fn load_label_font(configured: Option<&Path>) -> Result<Option<FontVec>> {
    if let Some(path) = configured {
        return read_font(path).map(Some);
    }

    for candidate in SYSTEM_FONTS.iter().map(Path::new) {
        if !candidate.is_file() { continue }
        match read_font(candidate) {
            Ok(font) => {
                log::debug!("[overlay] label font {}", candidate.display());
                return Ok(Some(font));
            }
            Err(e) => log::debug!("[overlay] skipping font {}: {e:#}", candidate.display()),
        }
    }

    log::warn!("[overlay] no usable font found, POI label will not be drawn (set `font` to a .ttf file)");
    Ok(None)
}
