// src/matcher.rs

//! Ranks stored palettes by how closely they resemble a set of image colors
//! in Lab space.

use crate::color::{HexColorError, Lab, Rgb};
use crate::palette::PaletteRecord;
use log::warn;

/// A palette together with its distance to the image colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMatch {
    pub record: PaletteRecord,
    pub distance: f64,
}

/// Mean, over the palette's colors, of the distance to the nearest image
/// color. Returns `f64::INFINITY` when either side is empty.
pub fn palette_distance(image: &[Lab], palette: &[Lab]) -> f64 {
    if image.is_empty() || palette.is_empty() {
        return f64::INFINITY;
    }
    let total: f64 = palette
        .iter()
        .map(|target| {
            image
                .iter()
                .map(|source| target.distance(source))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / palette.len() as f64
}

fn record_lab(record: &PaletteRecord) -> Result<Vec<Lab>, HexColorError> {
    record
        .colors
        .iter()
        .map(|hex| Rgb::from_hex(hex).map(Lab::from))
        .collect()
}

/// Returns the `limit` palettes nearest to `image_colors`, closest first.
/// Ties keep their input order. Palettes with unparseable colors are
/// skipped.
pub fn rank_palettes(
    image_colors: &[Rgb],
    palettes: &[PaletteRecord],
    limit: usize,
) -> Vec<PaletteMatch> {
    let image_lab: Vec<Lab> = image_colors.iter().map(Rgb::to_lab).collect();

    let mut scored: Vec<PaletteMatch> = palettes
        .iter()
        .filter_map(|record| match record_lab(record) {
            Ok(lab) => Some(PaletteMatch {
                distance: palette_distance(&image_lab, &lab),
                record: record.clone(),
            }),
            Err(e) => {
                warn!("Skipping palette {}: {}", record.id, e);
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    scored.truncate(limit);
    scored
}
