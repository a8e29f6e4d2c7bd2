use anyhow::Result;
use poimosaic::{run_mosaic, MosaicConfig};

use crate::cli::{Cli, MosaicArgs};

/// Layer CLI flags over the config file (or the built-in defaults).
fn resolve_config(args: &MosaicArgs) -> Result<MosaicConfig> {
    let mut config = match &args.config {
        Some(path) => MosaicConfig::from_json_file(path)?,
        None => MosaicConfig::default(),
    };

    if !args.coords.is_empty() { config.coordinates = args.coords.clone(); }
    if let Some(zoom) = args.zoom { config.zoom = zoom; }
    if let Some(tile_size) = args.tile_size { config.tile_size = tile_size; }
    if let Some(format) = &args.format { config.tile_format = format.clone(); }
    if let Some(api_key) = &args.api_key { config.api_key = api_key.clone(); }
    if let Some(folder) = &args.folder { config.folder = folder.clone(); }
    if let Some(output) = &args.output { config.output = output.clone(); }
    if let Some(fraction) = args.fraction { config.poi.fraction = fraction; }
    if let Some(side) = args.side { config.poi.side = side; }
    if let Some(offset) = args.offset_meters { config.poi.offset_meters = offset; }
    if let Some(font) = &args.font { config.font = Some(font.clone()); }
    if let Some(timeout) = args.timeout { config.timeout_secs = Some(timeout); }

    config.validate()?;
    Ok(config)
}

pub fn run(cli: &Cli, args: &MosaicArgs) -> Result<()> {
    let config = resolve_config(args)?;

    if cli.verbose > 0 {
        eprintln!("[mosaic] {} route point(s), zoom {}, tiles -> {}",
            config.coordinates.len(), config.zoom, config.folder.display());
    }

    let report = run_mosaic(&config)?;

    println!("Image saved as '{}'", report.output.display());
    println!("POI at lon {:.7}, lat {:.7} (pixel {}, {})",
        report.poi.position.x(), report.poi.position.y(), report.poi_pixel.0, report.poi_pixel.1);
    if !report.missing.is_empty() {
        println!("{} of {} tile(s) missing from the mosaic", report.missing.len(), report.grid.tile_count());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use poimosaic::Side;

    fn mosaic_args(argv: &[&str]) -> MosaicArgs {
        let cli = Cli::parse_from(["poimosaic", "mosaic"].iter().chain(argv));
        match cli.command {
            crate::cli::Commands::Mosaic(args) => args,
            _ => panic!("expected mosaic"),
        }
    }

    #[test]
    fn defaults_without_flags() {
        let mut args = mosaic_args(&[]);
        args.api_key = None; // ignore HERE_API_KEY from the environment
        assert_eq!(resolve_config(&args).unwrap(), MosaicConfig::default());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mosaic.json");
        std::fs::write(&path, r#"{ "zoom": 15, "tile_size": 256, "poi": { "side": "left" } }"#).unwrap();

        let args = mosaic_args(&["--config", path.to_str().unwrap(), "--zoom", "18", "--fraction", "0.25"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.zoom, 18);
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.poi.side, Side::Left);
        assert_eq!(config.poi.fraction, 0.25);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let args = mosaic_args(&["--coord", "1,1"]);
        assert!(resolve_config(&args).is_err());
    }
}
