use std::path::{Path, PathBuf};

#[cfg(feature = "download")]
use std::time::Duration;

#[cfg(feature = "download")]
use anyhow::{Context, Result};
#[cfg(feature = "download")]
use reqwest::{blocking::Client, StatusCode};

use crate::tiles::TileIndex;
#[cfg(feature = "download")]
use crate::{common::{ensure_dir_exists, write_atomic}, config::MosaicConfig, tiles::TileGrid};

/// HERE Maps raster tile endpoint (satellite imagery, Mercator tiling).
pub const TILE_ENDPOINT: &str = "https://maps.hereapi.com/v3/base/mc";

/// Tile URL, laid out exactly as the imagery service is queried.
pub fn tile_url(tile: TileIndex, zoom: u8, format: &str, tile_size: u32, api_key: &str) -> String {
    tile_url_at(TILE_ENDPOINT, tile, zoom, format, tile_size, api_key)
}

fn tile_url_at(endpoint: &str, tile: TileIndex, zoom: u8, format: &str, tile_size: u32, api_key: &str) -> String {
    format!(
        "{endpoint}/{zoom}/{x}/{y}/{format}&style=satellite.day&size={tile_size}?apiKey={api_key}",
        x = tile.x,
        y = tile.y,
    )
}

/// Local file name for a tile: `tile_z{zoom}_x{x}_y{y}.{format}`.
pub fn tile_file_name(tile: TileIndex, zoom: u8, format: &str) -> String {
    format!("tile_z{zoom}_x{}_y{}.{format}", tile.x, tile.y)
}

/// Full path of a tile inside `folder`.
pub fn tile_path(folder: &Path, tile: TileIndex, zoom: u8, format: &str) -> PathBuf {
    folder.join(tile_file_name(tile, zoom, format))
}

/// A tile that was downloaded successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedTile {
    pub index: TileIndex,
    pub path: PathBuf,
}

/// Sequential, single-attempt tile downloader.
#[cfg(feature = "download")]
pub struct TileFetcher {
    client: Client,
    endpoint: String,
    zoom: u8,
    tile_size: u32,
    format: String,
    api_key: String,
    folder: PathBuf,
}

#[cfg(feature = "download")]
impl TileFetcher {
    /// Build a fetcher from the mosaic settings. Without `timeout_secs` requests may block indefinitely.
    pub fn from_config(config: &MosaicConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("poimosaic/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: TILE_ENDPOINT.to_string(),
            zoom: config.zoom,
            tile_size: config.tile_size,
            format: config.tile_format.clone(),
            api_key: config.api_key.clone(),
            folder: config.folder.clone(),
        })
    }

    /// Download one tile. Returns `Ok(None)` when the service answers with anything but 200.
    pub fn download_tile(&self, tile: TileIndex) -> Result<Option<PathBuf>> {
        ensure_dir_exists(&self.folder)?;

        let url = tile_url_at(&self.endpoint, tile, self.zoom, &self.format, self.tile_size, &self.api_key);
        log::debug!("[fetch] GET z{} {tile}", self.zoom);

        let resp = self.client.get(&url).send()
            .with_context(|| format!("GET tile z{} {tile}", self.zoom))?;

        let status = resp.status();
        if status != StatusCode::OK {
            log::warn!("[fetch] Failed to download tile z{} {tile}: status code {}", self.zoom, status.as_u16());
            return Ok(None);
        }

        let body = resp.bytes()
            .with_context(|| format!("read body of tile z{} {tile}", self.zoom))?;
        let path = write_atomic(&tile_path(&self.folder, tile, self.zoom, &self.format), &body)?;

        log::debug!("[fetch] z{} {tile} -> {}", self.zoom, path.display());
        Ok(Some(path))
    }

    /// Download every tile of `grid`, x outer and y inner, keeping only the successes.
    pub fn download_grid(&self, grid: &TileGrid) -> Result<Vec<FetchedTile>> {
        log::info!("[fetch] {} tile(s) at zoom {} -> {}", grid.tile_count(), self.zoom, self.folder.display());

        let mut fetched = Vec::new();
        for index in grid.tiles() {
            if let Some(path) = self.download_tile(index)? {
                fetched.push(FetchedTile { index, path });
            }
        }

        if fetched.len() < grid.tile_count() {
            log::warn!("[fetch] {} of {} tile(s) missing, mosaic will have gaps",
                grid.tile_count() - fetched.len(), grid.tile_count());
        }
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_matches_service_layout() {
        let url = tile_url(TileIndex::new(14630, 29191), 16, "png", 512, "KEY");
        assert_eq!(
            url,
            "https://maps.hereapi.com/v3/base/mc/16/14630/29191/png&style=satellite.day&size=512?apiKey=KEY"
        );
    }

    #[test]
    fn file_name_is_keyed_by_zoom_and_index() {
        let tile = TileIndex::new(3, 9);
        assert_eq!(tile_file_name(tile, 5, "jpeg"), "tile_z5_x3_y9.jpeg");
        assert_eq!(
            tile_path(Path::new("tiles_output"), tile, 5, "png"),
            Path::new("tiles_output").join("tile_z5_x3_y9.png")
        );
    }

    #[cfg(feature = "download")]
    mod download {
        use std::fs;
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;

        use super::*;

        /// Local HTTP server: 200 with `body` when the request path contains `ok_path`, 404 otherwise.
        fn serve_tiles(ok_path: &'static str, body: &'static [u8]) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            std::thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(mut stream) = stream else { break };
                    let Ok(clone) = stream.try_clone() else { continue };
                    let mut reader = BufReader::new(clone);
                    let mut request_line = String::new();
                    if reader.read_line(&mut request_line).is_err() { continue }
                    loop {
                        let mut header = String::new();
                        match reader.read_line(&mut header) {
                            Ok(0) | Err(_) => break,
                            Ok(_) if header == "\r\n" => break,
                            Ok(_) => {}
                        }
                    }
                    let (status, payload): (&str, &[u8]) = if request_line.contains(ok_path) {
                        ("200 OK", body)
                    } else {
                        ("404 Not Found", b"no such tile")
                    };
                    let _ = write!(
                        stream,
                        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        payload.len()
                    );
                    let _ = stream.write_all(payload);
                }
            });
            format!("http://{addr}")
        }

        fn local_fetcher(endpoint: String, folder: &Path) -> TileFetcher {
            TileFetcher {
                client: Client::builder().no_proxy().build().unwrap(),
                endpoint,
                zoom: 5,
                tile_size: 4,
                format: "png".to_string(),
                api_key: "KEY".to_string(),
                folder: folder.to_path_buf(),
            }
        }

        #[test]
        fn ok_tile_is_saved_and_missing_tile_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let folder = dir.path().join("tiles");
            let fetcher = local_fetcher(serve_tiles("/5/3/7/png", b"tile-bytes"), &folder);

            let saved = fetcher.download_tile(TileIndex::new(3, 7)).unwrap().unwrap();
            assert_eq!(saved, folder.join("tile_z5_x3_y7.png"));
            assert_eq!(fs::read(&saved).unwrap(), b"tile-bytes");

            assert_eq!(fetcher.download_tile(TileIndex::new(3, 8)).unwrap(), None);
            assert_eq!(fs::read_dir(&folder).unwrap().count(), 1);
        }

        #[test]
        fn grid_download_keeps_only_successful_tiles() {
            let dir = tempfile::tempdir().unwrap();
            let folder = dir.path().join("tiles");
            let fetcher = local_fetcher(serve_tiles("/5/3/7/png", b"tile-bytes"), &folder);
            let grid = TileGrid { zoom: 5, x_min: 3, x_max: 3, y_min: 7, y_max: 8 };

            let tiles = fetcher.download_grid(&grid).unwrap();
            assert_eq!(tiles, vec![FetchedTile {
                index: TileIndex::new(3, 7),
                path: folder.join("tile_z5_x3_y7.png"),
            }]);
            assert!(!folder.join("tile_z5_x3_y8.png").exists());
        }

        #[test]
        fn unreachable_service_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            // Bind then drop to get a port nothing listens on.
            let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
            let fetcher = local_fetcher(format!("http://127.0.0.1:{port}"), dir.path());
            assert!(fetcher.download_tile(TileIndex::new(0, 0)).is_err());
        }
    }
}
