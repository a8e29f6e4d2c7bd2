use anyhow::{bail, Context, Result};
use image::{imageops, ImageReader, RgbImage};

use crate::tiles::{FetchedTile, TileGrid};

/// Paste fetched tiles into one raster sized to the whole grid.
///
/// Tiles absent from `tiles` leave black gaps. Tile images are placed as-is,
/// without resizing.
pub fn compose_mosaic(tiles: &[FetchedTile], grid: &TileGrid, tile_size: u32) -> Result<RgbImage> {
    let (width, height) = grid.pixel_size(tile_size)?;
    let mut mosaic = RgbImage::new(width, height);

    for tile in tiles {
        if !grid.contains(tile.index) {
            bail!("Tile {} lies outside the mosaic grid {:?}", tile.index, grid);
        }
        // The service may answer with a different encoding than the requested extension.
        let image = ImageReader::open(&tile.path)
            .and_then(|reader| reader.with_guessed_format())
            .with_context(|| format!("Failed to open tile image {}", tile.path.display()))?
            .decode()
            .with_context(|| format!("Failed to decode tile image {}", tile.path.display()))?
            .to_rgb8();
        let (x, y) = grid.pixel_offset(tile.index, tile_size);
        imageops::replace(&mut mosaic, &image, x as i64, y as i64);
    }

    log::info!("[mosaic] composed {}x{} px from {} of {} tile(s)", width, height, tiles.len(), grid.tile_count());
    Ok(mosaic)
}
