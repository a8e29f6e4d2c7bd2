use std::path::PathBuf;

use ab_glyph::FontVec;
use anyhow::{Context, Result};
use image::RgbImage;

use crate::common::ensure_dir_exists;
use crate::config::MosaicConfig;
use crate::mosaic::{compose_mosaic, draw_poi, draw_route, load_label_font};
use crate::route::{place_poi, Poi, Route};
use crate::tiles::{FetchedTile, TileGrid, TileIndex};

/// Outcome of one mosaic run.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicReport {
    pub grid: TileGrid,
    /// Tiles that made it into the mosaic.
    pub fetched: usize,
    /// Grid tiles left as gaps.
    pub missing: Vec<TileIndex>,
    pub poi: Poi,
    /// POI position in mosaic pixels.
    pub poi_pixel: (i32, i32),
    pub output: PathBuf,
}

/// Draw the route and its POI onto a composed mosaic.
pub fn annotate_mosaic(
    mosaic: &mut RgbImage,
    grid: &TileGrid,
    config: &MosaicConfig,
    font: Option<&FontVec>,
) -> Result<(Poi, (i32, i32))> {
    let coords = config.coords();
    let pixels = coords.iter()
        .map(|&coord| grid.project(coord, config.tile_size))
        .collect::<Vec<_>>();
    draw_route(mosaic, &pixels);

    let route = Route::new(&coords)?;
    let poi = place_poi(&route, config.poi.fraction, config.poi.side, config.poi.offset_meters)
        .context("Failed to place POI")?;
    let poi_pixel = grid.project(poi.position.0, config.tile_size);
    draw_poi(mosaic, poi_pixel, &config.poi.label, font);

    log::info!(
        "[poi] {:.0}% along route, {} m {}: ({:.7}, {:.7}) -> px {:?}",
        config.poi.fraction * 100.0,
        config.poi.offset_meters,
        config.poi.side,
        poi.position.x(),
        poi.position.y(),
        poi_pixel,
    );
    Ok((poi, poi_pixel))
}

/// Compose already-fetched tiles, annotate, and save the final image.
pub fn render_mosaic(config: &MosaicConfig, grid: &TileGrid, tiles: &[FetchedTile]) -> Result<MosaicReport> {
    let mut mosaic = compose_mosaic(tiles, grid, config.tile_size)?;

    let font = load_label_font(config.font.as_deref())?;
    let (poi, poi_pixel) = annotate_mosaic(&mut mosaic, grid, config, font.as_ref())?;

    if let Some(dir) = config.output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        ensure_dir_exists(dir)?;
    }
    mosaic.save(&config.output)
        .with_context(|| format!("Failed to save image {}", config.output.display()))?;
    log::info!("[mosaic] saved {}", config.output.display());

    let missing = grid.tiles()
        .filter(|index| !tiles.iter().any(|tile| tile.index == *index))
        .collect();

    Ok(MosaicReport {
        grid: *grid,
        fetched: tiles.len(),
        missing,
        poi,
        poi_pixel,
        output: config.output.clone(),
    })
}

/// Full run: tile grid, download, composition, overlay, save.
#[cfg(feature = "download")]
pub fn run_mosaic(config: &MosaicConfig) -> Result<MosaicReport> {
    use crate::tiles::TileFetcher;

    config.validate()?;

    let grid = TileGrid::covering(&config.coords(), config.zoom)?;
    let (width, height) = grid.pixel_size(config.tile_size)
        .context("Route does not fit in a single mosaic at this zoom")?;
    log::info!(
        "[mosaic] grid x {}..={} y {}..={} at zoom {} ({width}x{height} px)",
        grid.x_min, grid.x_max, grid.y_min, grid.y_max, grid.zoom,
    );

    let fetcher = TileFetcher::from_config(config)?;
    let tiles = fetcher.download_grid(&grid)?;

    render_mosaic(config, &grid, &tiles)
}
