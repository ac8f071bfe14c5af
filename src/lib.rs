// src/lib.rs

//! Harvests color palettes from the ColorHunt feed and writes them to
//! `palettes.json` / `palettes.csv`, and matches images against the
//! harvested palettes.

pub mod app;
pub mod collector;
pub mod color;
pub mod config;
pub mod dominant;
pub mod feed;
pub mod matcher;
pub mod palette;
pub mod writer;

pub use collector::{CollectOptions, Collector, Sleeper, ThreadSleeper};
pub use config::Config;
pub use feed::{FeedError, FeedItem, HttpFeed, PaletteFeed};
pub use palette::{decode_palette, PaletteRecord};
