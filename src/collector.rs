// src/collector.rs

//! The pagination loop: fetch pages until enough unique palettes are held or
//! the feed runs dry.

use crate::config::CollectConfig;
use crate::feed::{FeedError, PaletteFeed};
use crate::palette::PaletteRecord;
use log::{debug, info, trace, warn};
use std::collections::HashSet;
use std::time::Duration;

/// Waits between page requests. Tests substitute a recorder.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Parameters for one collection run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectOptions {
    pub target_count: usize,
    pub sort: String,
    pub tags: String,
    pub pause: Duration,
    pub max_steps: Option<u64>,
}

impl From<&CollectConfig> for CollectOptions {
    fn from(config: &CollectConfig) -> Self {
        CollectOptions {
            target_count: config.target_count,
            sort: config.sort.clone(),
            tags: config.tags.clone(),
            pause: Duration::from_millis(config.pause_ms),
            max_steps: config.max_steps,
        }
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions::from(&CollectConfig::default())
    }
}

/// Drives a [`PaletteFeed`] page by page.
pub struct Collector<F, S = ThreadSleeper> {
    feed: F,
    sleeper: S,
}

impl<F: PaletteFeed> Collector<F, ThreadSleeper> {
    pub fn new(feed: F) -> Self {
        Collector::with_sleeper(feed, ThreadSleeper)
    }
}

impl<F: PaletteFeed, S: Sleeper> Collector<F, S> {
    pub fn with_sleeper(feed: F, sleeper: S) -> Self {
        Collector { feed, sleeper }
    }

    pub fn into_parts(self) -> (F, S) {
        (self.feed, self.sleeper)
    }

    /// Collects up to `options.target_count` palettes with distinct codes.
    ///
    /// Stops early, without error, when the feed returns an empty page or the
    /// optional step cap is hit. A feed error aborts the run and is returned
    /// as is; nothing collected so far is kept.
    pub fn collect(&mut self, options: &CollectOptions) -> Result<Vec<PaletteRecord>, FeedError> {
        let mut results: Vec<PaletteRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut step: u64 = 0;

        while results.len() < options.target_count {
            if options.max_steps.is_some_and(|cap| step >= cap) {
                warn_step_cap(step, results.len(), options.target_count);
                break;
            }

            let batch = self.feed.fetch_batch(step, &options.sort, &options.tags)?;
            if batch.is_empty() {
                info!("Feed exhausted at step {} with {} palettes", step, results.len());
                break;
            }
            let before = results.len();

            for item in &batch {
                let code = item.code();
                if code.is_empty() || seen.contains(code) {
                    continue;
                }
                let Some(record) = PaletteRecord::from_code(code, item.likes(), item.date()) else {
                    trace!("Discarding malformed palette code {:?}", code);
                    continue;
                };
                seen.insert(record.id.clone());
                results.push(record);
                if results.len() >= options.target_count {
                    break;
                }
            }

            debug!(
                "Step {}: {} items, {} new palettes, {} total",
                step,
                batch.len(),
                results.len() - before,
                results.len()
            );

            if results.len() >= options.target_count {
                break;
            }
            // No pause after the last page the cap allows.
            if options.max_steps.is_some_and(|cap| step + 1 >= cap) {
                warn_step_cap(step + 1, results.len(), options.target_count);
                break;
            }
            step += 1;
            self.sleeper.sleep(options.pause);
        }

        Ok(results)
    }
}

fn warn_step_cap(steps: u64, collected: usize, target: usize) {
    warn!("Step cap of {} reached with {}/{} palettes; stopping", steps, collected, target);
}
