//! Scripted feed and recording sleeper for driving the collector without a
//! network.

#![allow(dead_code)]

use palette_harvest::{FeedError, FeedItem, PaletteFeed, Sleeper};
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

/// One scripted response.
pub enum Page {
    Items(Vec<FeedItem>),
    Fail,
}

/// Replays pages in order and records every request. Once the script runs
/// out it answers with empty pages.
#[derive(Default)]
pub struct ScriptedFeed {
    pages: VecDeque<Page>,
    pub requests: Vec<(u64, String, String)>,
}

impl ScriptedFeed {
    pub fn new(pages: Vec<Vec<FeedItem>>) -> Self {
        Self {
            pages: pages.into_iter().map(Page::Items).collect(),
            requests: Vec::new(),
        }
    }

    pub fn from_json(pages: &[&str]) -> Self {
        Self::new(
            pages
                .iter()
                .map(|page| serde_json::from_str(page).expect("scripted page is valid JSON"))
                .collect(),
        )
    }

    pub fn then_fail(mut self) -> Self {
        self.pages.push_back(Page::Fail);
        self
    }

    pub fn steps(&self) -> Vec<u64> {
        self.requests.iter().map(|(step, _, _)| *step).collect()
    }
}

impl PaletteFeed for ScriptedFeed {
    fn fetch_batch(
        &mut self,
        step: u64,
        sort: &str,
        tags: &str,
    ) -> Result<Vec<FeedItem>, FeedError> {
        self.requests.push((step, sort.to_string(), tags.to_string()));
        match self.pages.pop_front() {
            Some(Page::Items(items)) => Ok(items),
            Some(Page::Fail) => Err(FeedError::Status { step, status: 503 }),
            None => Ok(Vec::new()),
        }
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub pauses: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

pub fn item(code: &str, likes: &str) -> FeedItem {
    FeedItem::new(code, Value::String(likes.to_string()), "2023-01-01")
}
