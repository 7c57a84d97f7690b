//! Whole-run orchestration: enumerate seed files, convert each one, write
//! one JSON file per converted record.
//!
//! All filesystem work lives here so the converters stay pure text-in,
//! record-out functions. Existing output files are left untouched unless
//! the run asks for `force`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::convert::{convert_employees, convert_milestones, convert_tile};
use crate::error::MigrateError;

const EMPLOYEES_SEED: &str = "base_employees_full.tres";
const MILESTONES_SEED: &str = "base_milestones_full.tres";

#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Project root every other path is resolved against.
    pub root: PathBuf,
    /// Legacy seeds directory, relative to `root`.
    pub seeds_dir: PathBuf,
    /// Output directory, relative to `root`.
    pub out_dir: PathBuf,
    /// Overwrite output files that already exist.
    pub force: bool,
}

/// Counts reported after a completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSummary {
    pub tiles: usize,
    pub employees: usize,
    pub milestones: usize,
    pub written: usize,
    pub skipped: usize,
}

/// Runs the full migration: tiles first, then employees, then milestones.
/// The first conversion or I/O failure aborts the run.
pub fn run(config: &MigrationConfig) -> Result<MigrationSummary> {
    let seeds = config.root.join(&config.seeds_dir);
    let tiles_in = seeds.join("tiles");
    if !tiles_in.is_dir() {
        return Err(MigrateError::MissingTilesDir(tiles_in).into());
    }

    let out_root = config.root.join(&config.out_dir);
    let mut summary = MigrationSummary::default();

    for path in tile_seed_files(&tiles_in)? {
        let text = read_seed(&path)?;
        let tile = convert_tile(&text)
            .with_context(|| format!("failed to convert {}", path.display()))?;
        let out = out_root.join("tiles").join(format!("{}.json", tile.id));
        record_write(write_record(&out, &tile, config.force)?, &mut summary);
        summary.tiles += 1;
    }

    let roster_path = seeds.join(EMPLOYEES_SEED);
    let employees = convert_employees(&read_seed(&roster_path)?)
        .with_context(|| format!("failed to convert {}", roster_path.display()))?;
    summary.employees = employees.len();
    for record in &employees {
        let out = out_root.join("employees").join(format!("{}.json", record.id));
        record_write(write_record(&out, record, config.force)?, &mut summary);
    }

    let milestones_path = seeds.join(MILESTONES_SEED);
    let milestones = convert_milestones(&read_seed(&milestones_path)?)
        .with_context(|| format!("failed to convert {}", milestones_path.display()))?;
    summary.milestones = milestones.len();
    for record in &milestones {
        let out = out_root.join("milestones").join(format!("{}.json", record.id));
        record_write(write_record(&out, record, config.force)?, &mut summary);
    }

    Ok(summary)
}

/// Tile seeds, `Tile_*.tres` only, in name order so runs are repeatable.
fn tile_seed_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with("Tile_") && name.ends_with(".tres") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn read_seed(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Writes one record as pretty-printed JSON with a trailing newline.
/// Returns false when the file already exists and `force` is off.
fn write_record<T: Serialize>(path: &Path, record: &T, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut json = serde_json::to_string_pretty(record)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

fn record_write(written: bool, summary: &mut MigrationSummary) {
    if written {
        summary.written += 1;
    } else {
        summary.skipped += 1;
    }
}
