// src/config.rs

//! Defines the configuration structures for `palette-harvest`.
//!
//! Every section deserializes from TOML with `#[serde(default)]`, so a config
//! file only needs to name the values it changes. The defaults reproduce the
//! fixed constants the harvester has always run with: the ColorHunt feed
//! endpoint, a 20 second request timeout, 100 palettes, a 250 ms pause between
//! pages, and `palettes.json` / `palettes.csv` in the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// --- Defaults ---

pub const DEFAULT_FEED_URL: &str = "https://colorhunt.co/php/feed.php";
pub const DEFAULT_ORIGIN: &str = "https://colorhunt.co";
pub const DEFAULT_REFERER: &str = "https://colorhunt.co/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_TARGET_COUNT: usize = 100;
pub const DEFAULT_SORT: &str = "random";
pub const DEFAULT_PAUSE_MS: u64 = 250;

pub const DEFAULT_JSON_PATH: &str = "palettes.json";
pub const DEFAULT_CSV_PATH: &str = "palettes.csv";

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// --- Top-Level Configuration Structure ---

/// Complete configuration for a harvester run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Remote feed endpoint and request shape.
    pub feed: FeedConfig,
    /// Pagination loop settings.
    pub collect: CollectConfig,
    /// Where the collected palettes are written.
    pub output: OutputConfig,
    /// Settings for matching an image against stored palettes.
    pub matching: MatchConfig,
}

impl Config {
    /// Loads the configuration from `path`, or returns the defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

// --- Feed Configuration ---

/// The endpoint and the browser-like headers sent with every page request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub origin: String,
    pub referer: String,
    pub user_agent: String,
    pub content_type: String,
    /// Per-request timeout covering connect, send and body read.
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            url: DEFAULT_FEED_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// --- Collection Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    /// Stop once this many unique palettes are collected.
    pub target_count: usize,
    /// Feed ordering (`random`, `new`, `popular`, ...), sent verbatim.
    pub sort: String,
    /// Tag filter, sent verbatim. Empty means no filter.
    pub tags: String,
    /// Pause between consecutive page requests.
    pub pause_ms: u64,
    /// Optional upper bound on the number of pages requested. `None` keeps
    /// paging until the target is reached or the feed runs dry.
    pub max_steps: Option<u64>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        CollectConfig {
            target_count: DEFAULT_TARGET_COUNT,
            sort: DEFAULT_SORT.to_string(),
            tags: String::new(),
            pause_ms: DEFAULT_PAUSE_MS,
            max_steps: None,
        }
    }
}

// --- Output Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            json_path: PathBuf::from(DEFAULT_JSON_PATH),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

// --- Matching Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of k-means clusters extracted from the image.
    pub dominant_colors: usize,
    /// Pixels beyond this count are randomly subsampled.
    pub max_pixel_samples: usize,
    /// The image is scaled down so its longest side is at most this.
    pub max_dimension: u32,
    pub kmeans_iterations: usize,
    /// How many of the nearest palettes to report.
    pub results: usize,
    /// Palette file produced by a previous `collect` run.
    pub palettes_path: PathBuf,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            dominant_colors: 5,
            max_pixel_samples: 6000,
            max_dimension: 420,
            kmeans_iterations: 12,
            results: 8,
            palettes_path: PathBuf::from(DEFAULT_JSON_PATH),
        }
    }
}
