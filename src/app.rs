// src/app.rs

//! Top-level flows behind the CLI subcommands.

use crate::collector::{CollectOptions, Collector, Sleeper};
use crate::color::Rgb;
use crate::config::{Config, MatchConfig, OutputConfig};
use crate::dominant;
use crate::feed::PaletteFeed;
use crate::matcher::{self, PaletteMatch};
use crate::palette::PaletteRecord;
use crate::writer;
use anyhow::Context;
use log::info;
use rand::Rng;
use std::path::Path;

/// Collects palettes from `feed` and, once collection has finished, writes
/// both output files. Nothing is written if collection fails.
pub fn collect_and_write<F, S>(
    collector: &mut Collector<F, S>,
    config: &Config,
) -> anyhow::Result<Vec<PaletteRecord>>
where
    F: PaletteFeed,
    S: Sleeper,
{
    let options = CollectOptions::from(&config.collect);
    info!(
        "Collecting up to {} palettes (sort={:?}, tags={:?})",
        options.target_count, options.sort, options.tags
    );
    let records = collector
        .collect(&options)
        .context("Failed to collect palettes")?;
    write_outputs(&records, &config.output)?;
    Ok(records)
}

pub fn write_outputs(records: &[PaletteRecord], output: &OutputConfig) -> anyhow::Result<()> {
    writer::write_json(records, &output.json_path)
        .with_context(|| format!("Failed to write {}", output.json_path.display()))?;
    info!("Wrote {}", output.json_path.display());
    writer::write_csv(records, &output.csv_path)
        .with_context(|| format!("Failed to write {}", output.csv_path.display()))?;
    info!("Wrote {}", output.csv_path.display());
    Ok(())
}

/// Result of matching an image against the stored palettes.
#[derive(Debug, Clone)]
pub struct ImageMatch {
    pub dominant: Vec<Rgb>,
    pub palettes: Vec<PaletteMatch>,
}

/// Extracts the image's dominant colors and ranks the palettes in
/// `config.palettes_path` against them.
pub fn match_image<R: Rng>(
    image_path: &Path,
    config: &MatchConfig,
    rng: &mut R,
) -> anyhow::Result<ImageMatch> {
    let palettes_path = &config.palettes_path;
    let palettes = writer::read_json(palettes_path)
        .with_context(|| format!("Failed to load palettes from {}", palettes_path.display()))?;
    info!("Loaded {} palettes", palettes.len());

    let image = image::open(image_path)
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;
    let dominant = dominant::dominant_colors(&image, config, rng);
    let palettes = matcher::rank_palettes(&dominant, &palettes, config.results);
    Ok(ImageMatch { dominant, palettes })
}
