// src/writer.rs

//! Serializes collected palettes to JSON and to semicolon-delimited text.
//!
//! Both file writers truncate an existing file at the target path. They are
//! only called once collection has finished, so a failed run leaves no
//! partial output behind.

use crate::palette::{PaletteRecord, PALETTE_SIZE};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CSV_DELIMITER: u8 = b';';
pub const CSV_HEADER: [&str; 7] = ["id", "color1", "color2", "color3", "color4", "likes", "date"];

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// --- JSON ---

/// Writes `records` as a pretty-printed JSON array (2-space indent, UTF-8,
/// non-ASCII left unescaped).
pub fn write_json_to<W: Write>(records: &[PaletteRecord], writer: W) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

pub fn write_json(records: &[PaletteRecord], path: &Path) -> Result<(), OutputError> {
    let file = File::create(path).map_err(io_error(path))?;
    write_json_to(records, file)
}

/// Loads a palettes file previously produced by [`write_json`].
pub fn read_json(path: &Path) -> Result<Vec<PaletteRecord>, OutputError> {
    let file = File::open(path).map_err(io_error(path))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

// --- Delimited text ---

/// Writes the header row and one row per record, `;`-separated with CRLF
/// row endings. Fields are quoted only when they contain a delimiter, quote
/// or line break.
pub fn write_csv_to<W: Write>(records: &[PaletteRecord], writer: W) -> Result<(), OutputError> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for record in records {
        let likes = record.likes.to_string();
        let mut row: Vec<&str> = Vec::with_capacity(CSV_HEADER.len());
        row.push(&record.id);
        row.extend((0..PALETTE_SIZE).map(|i| record.colors.get(i).map_or("", String::as_str)));
        row.push(&likes);
        row.push(&record.date);
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_csv(records: &[PaletteRecord], path: &Path) -> Result<(), OutputError> {
    let file = File::create(path).map_err(io_error(path))?;
    write_csv_to(records, file)
}
