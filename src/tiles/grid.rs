use anyhow::{bail, Result};
use geo::Coord;

use crate::tiles::{lat_lon_to_tile, TileIndex};

/// Inclusive rectangle of tiles covering a set of coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    pub zoom: u8,
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl TileGrid {
    /// Smallest grid containing the tile of every (lon, lat) coordinate.
    pub fn covering(coords: &[Coord<f64>], zoom: u8) -> Result<Self> {
        let mut tiles = coords.iter().map(|c| lat_lon_to_tile(c.y, c.x, zoom));
        let Some(first) = tiles.next() else {
            bail!("Cannot build a tile grid from an empty coordinate list");
        };

        Ok(tiles.fold(
            Self { zoom, x_min: first.x, x_max: first.x, y_min: first.y, y_max: first.y },
            |grid, tile| Self {
                zoom,
                x_min: grid.x_min.min(tile.x),
                x_max: grid.x_max.max(tile.x),
                y_min: grid.y_min.min(tile.y),
                y_max: grid.y_max.max(tile.y),
            },
        ))
    }

    /// Number of tile columns.
    #[inline] pub fn width(&self) -> u32 { self.x_max - self.x_min + 1 }

    /// Number of tile rows.
    #[inline] pub fn height(&self) -> u32 { self.y_max - self.y_min + 1 }

    /// Total number of tiles in the grid.
    #[inline] pub fn tile_count(&self) -> usize { self.width() as usize * self.height() as usize }

    /// Top-left tile, the mosaic's pixel origin.
    #[inline] pub fn origin(&self) -> TileIndex { TileIndex::new(self.x_min, self.y_min) }

    #[inline]
    pub fn contains(&self, tile: TileIndex) -> bool {
        (self.x_min..=self.x_max).contains(&tile.x) && (self.y_min..=self.y_max).contains(&tile.y)
    }

    /// Every tile in fetch order: x outer, y inner.
    pub fn tiles(&self) -> impl Iterator<Item = TileIndex> + '_ {
        (self.x_min..=self.x_max)
            .flat_map(move |x| (self.y_min..=self.y_max).map(move |y| TileIndex::new(x, y)))
    }

    /// Mosaic dimensions in pixels.
    ///
    /// Errors when either side exceeds `i32::MAX` pixels or the RGB buffer
    /// would not fit in memory addressing.
    pub fn pixel_size(&self, tile_size: u32) -> Result<(u32, u32)> {
        let (Some(width), Some(height)) = (
            self.width().checked_mul(tile_size),
            self.height().checked_mul(tile_size),
        ) else {
            bail!("Mosaic of {}x{} tiles at {tile_size} px overflows the pixel range", self.width(), self.height());
        };
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            bail!("Mosaic of {width}x{height} px exceeds the pixel range");
        }
        if (width as usize).checked_mul(height as usize).and_then(|n| n.checked_mul(3)).is_none() {
            bail!("Mosaic of {width}x{height} px is too large to allocate");
        }
        Ok((width, height))
    }

    /// Pixel offset of `tile` inside the mosaic.
    #[inline]
    pub fn pixel_offset(&self, tile: TileIndex, tile_size: u32) -> (u32, u32) {
        ((tile.x - self.x_min) * tile_size, (tile.y - self.y_min) * tile_size)
    }

    /// Mosaic pixel position of a (lon, lat) coordinate.
    #[inline]
    pub fn project(&self, coord: Coord<f64>, tile_size: u32) -> (i32, i32) {
        let origin = self.origin();
        crate::tiles::latlon_to_pixel(coord.y, coord.x, self.zoom, origin.x, origin.y, tile_size)
    }
}
