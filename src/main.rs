use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use seed_migrate::{run, MigrationConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert legacy .tres content seeds to per-entity JSON")]
struct Cli {
    /// Project root the seed and output paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Legacy seeds directory, relative to the project root
    #[arg(long, default_value = "tools/migration/legacy_seeds")]
    seeds_dir: PathBuf,

    /// Output directory for converted JSON, relative to the project root
    #[arg(long, default_value = "tools/migration/out_legacy_json")]
    out_dir: PathBuf,

    /// Overwrite output files that already exist
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MigrationConfig {
        root: cli.root,
        seeds_dir: cli.seeds_dir,
        out_dir: cli.out_dir,
        force: cli.force,
    };
    let summary = run(&config)?;
    println!(
        "Converted {} tiles, {} employees, {} milestones. Wrote {} files, skipped {} existing.",
        summary.tiles, summary.employees, summary.milestones, summary.written, summary.skipped
    );
    Ok(())
}
