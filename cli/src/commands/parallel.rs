use anyhow::Result;
use poimosaic::{run_parallel, ParallelConfig};

use crate::cli::{Cli, ParallelArgs};

pub fn run(cli: &Cli, args: &ParallelArgs) -> Result<()> {
    let config = ParallelConfig {
        input: args.input.clone(),
        output: args.output.clone().unwrap_or_else(|| ParallelConfig::default().output),
        tolerance_deg: args.tolerance,
    };

    if cli.verbose > 0 {
        eprintln!("[parallel] {} -> {} (tolerance {}°)",
            config.input.display(), config.output.display(), config.tolerance_deg);
    }

    let report = run_parallel(&config)?;
    report.write_summary(&mut std::io::stdout().lock())?;

    println!();
    println!("Saved '{}' with the 'has_parallel' column.", config.output.display());
    Ok(())
}
