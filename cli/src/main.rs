mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{mosaic, parallel};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Logs go to stderr; stdout carries only command results.
fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match &cli.command {
        Commands::Mosaic(args) => mosaic::run(&cli, args),
        Commands::Parallel(args) => parallel::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
