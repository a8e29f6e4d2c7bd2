mod fetch;
mod grid;
mod index;

pub use fetch::{tile_file_name, tile_path, tile_url, FetchedTile, TILE_ENDPOINT};
#[cfg(feature = "download")]
pub use fetch::TileFetcher;
pub use grid::TileGrid;
pub use index::{fractional_tile, lat_lon_to_tile, latlon_to_pixel, tile_coords_to_lat_lon, TileIndex, MAX_LATITUDE};
