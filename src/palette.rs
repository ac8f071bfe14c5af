// src/palette.rs

//! The palette record and the decoder for ColorHunt palette codes.
//!
//! A palette code is a run of 6-character hex colors with no separators, e.g.
//! `"F9ED69F08A5DB83B5E6A2C70"`. Decoding is deliberately lenient: only the
//! length is checked, so non-hex characters come through unchanged.

use serde::{Deserialize, Serialize};

/// Width of one color inside a palette code.
pub const CHUNK_LEN: usize = 6;

/// Number of colors a stored palette must have.
pub const PALETTE_SIZE: usize = 4;

/// One collected palette, as written to `palettes.json` and `palettes.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteRecord {
    /// The raw palette code. Unique within a collection run.
    pub id: String,
    /// `#RRGGBB` strings in code order.
    pub colors: Vec<String>,
    pub likes: u64,
    /// Passed through from the feed without interpretation.
    pub date: String,
}

impl PaletteRecord {
    /// Builds a record from a raw code, or returns `None` when the code does
    /// not decode to exactly [`PALETTE_SIZE`] colors.
    pub fn from_code(code: &str, likes: u64, date: impl Into<String>) -> Option<Self> {
        let colors = decode_palette(code);
        if colors.len() != PALETTE_SIZE {
            return None;
        }
        Some(PaletteRecord {
            id: code.to_string(),
            colors,
            likes,
            date: date.into(),
        })
    }
}

/// Splits a palette code into `#`-prefixed 6-character chunks.
///
/// Returns an empty vector when the code is empty or its length is not a
/// multiple of [`CHUNK_LEN`]. Length and chunking are measured in chars.
pub fn decode_palette(code: &str) -> Vec<String> {
    let chars: Vec<char> = code.chars().collect();
    if chars.is_empty() || chars.len() % CHUNK_LEN != 0 {
        return Vec::new();
    }
    chars
        .chunks(CHUNK_LEN)
        .map(|chunk| {
            let mut color = String::with_capacity(CHUNK_LEN + 1);
            color.push('#');
            color.extend(chunk);
            color
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_decodes_to_nothing() {
        assert!(decode_palette("").is_empty());
    }

    #[test]
    fn lengths_off_the_chunk_grid_decode_to_nothing() {
        for code in ["A", "ABCDE", "ABCDEF0", "AAAAAABBBBBBCCCCCCDDDDD"] {
            assert!(decode_palette(code).is_empty(), "{code:?}");
        }
    }

    #[test]
    fn four_chunks_keep_their_order() {
        assert_eq!(
            decode_palette("AAAAAABBBBBBCCCCCCDDDDDD"),
            vec!["#AAAAAA", "#BBBBBB", "#CCCCCC", "#DDDDDD"]
        );
    }

    #[test]
    fn other_multiples_of_six_still_decode() {
        assert_eq!(decode_palette("112233"), vec!["#112233"]);
        assert_eq!(decode_palette(&"ab12cd".repeat(5)).len(), 5);
    }

    #[test]
    fn non_hex_characters_pass_through() {
        assert_eq!(
            decode_palette("zzzzzz!!!!!!"),
            vec!["#zzzzzz", "#!!!!!!"]
        );
    }

    #[test]
    fn multibyte_input_is_chunked_by_char() {
        assert_eq!(decode_palette("éééééé"), vec!["#éééééé"]);
    }

    #[test]
    fn record_requires_exactly_four_colors() {
        assert!(PaletteRecord::from_code("112233445566", 1, "x").is_none());
        assert!(PaletteRecord::from_code(&"112233".repeat(5), 1, "x").is_none());

        let record = PaletteRecord::from_code("F9ED69F08A5DB83B5E6A2C70", 7, "3 weeks").unwrap();
        assert_eq!(record.id, "F9ED69F08A5DB83B5E6A2C70");
        assert_eq!(record.colors, vec!["#F9ED69", "#F08A5D", "#B83B5E", "#6A2C70"]);
        assert_eq!(record.likes, 7);
        assert_eq!(record.date, "3 weeks");
    }
}
