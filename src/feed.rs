// src/feed.rs

//! Page fetching from the remote palette feed.
//!
//! [`PaletteFeed`] is the seam between the collector loop and the network.
//! [`HttpFeed`] is the real implementation: one form-encoded POST per page,
//! with the endpoint and headers fixed at construction time.

use crate::config::FeedConfig;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single page request. Any of these aborts a collection run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed returned HTTP status {status} for step {step}")]
    Status { step: u64, status: u16 },
    #[error("request for step {step} failed: {source}")]
    Transport {
        step: u64,
        #[source]
        source: ureq::Error,
    },
    #[error("failed to read response body for step {step}: {source}")]
    Body {
        step: u64,
        #[source]
        source: ureq::Error,
    },
    #[error("response for step {step} is not a palette list: {source}")]
    Decode {
        step: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// One raw object from the feed. Only the fields the harvester reads are
/// modelled; everything else in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub likes: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
}

impl FeedItem {
    pub fn new(code: &str, likes: Value, date: &str) -> Self {
        FeedItem {
            code: Some(code.to_string()),
            likes: Some(likes),
            date: Some(Value::String(date.to_string())),
        }
    }

    /// The palette code, empty when absent.
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }

    /// Like count coerced to a non-negative integer.
    ///
    /// The feed sends likes as a string most of the time and as a number
    /// occasionally. Missing, empty, negative, unparseable or out-of-range
    /// values are 0.
    pub fn likes(&self) -> u64 {
        match &self.likes {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().and_then(float_likes))
                .unwrap_or(0),
            Some(Value::String(s)) => parse_likes(s),
            _ => 0,
        }
    }

    /// The date, passed through as text.
    pub fn date(&self) -> String {
        match &self.date {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

fn parse_likes(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return n;
    }
    raw.parse::<f64>().ok().and_then(float_likes).unwrap_or(0)
}

/// Truncates a float count. Values outside `0..u64::MAX` are rejected
/// rather than saturated.
fn float_likes(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f < u64::MAX as f64).then(|| f as u64)
}

/// Source of palette pages.
pub trait PaletteFeed {
    /// Fetches the page at `step` for the given ordering and tag filter.
    /// An empty vector means the feed is exhausted.
    fn fetch_batch(
        &mut self,
        step: u64,
        sort: &str,
        tags: &str,
    ) -> Result<Vec<FeedItem>, FeedError>;
}

/// Blocking HTTP client for the ColorHunt feed endpoint.
pub struct HttpFeed {
    agent: ureq::Agent,
    config: FeedConfig,
}

impl HttpFeed {
    pub fn new(config: FeedConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        HttpFeed { agent, config }
    }
}

impl PaletteFeed for HttpFeed {
    fn fetch_batch(
        &mut self,
        step: u64,
        sort: &str,
        tags: &str,
    ) -> Result<Vec<FeedItem>, FeedError> {
        debug!("POST {} step={} sort={:?} tags={:?}", self.config.url, step, sort, tags);

        let form = [
            ("step", step.to_string()),
            ("sort", sort.to_string()),
            ("tags", tags.to_string()),
        ];
        let mut response = self
            .agent
            .post(self.config.url.as_str())
            .header("Content-Type", &self.config.content_type)
            .header("Origin", &self.config.origin)
            .header("Referer", &self.config.referer)
            .header("User-Agent", &self.config.user_agent)
            .send_form(form)
            .map_err(|source| match source {
                ureq::Error::StatusCode(status) => FeedError::Status { step, status },
                source => FeedError::Transport { step, source },
            })?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|source| FeedError::Body { step, source })?;
        parse_batch(step, &body)
    }
}

/// Parses one page body into feed items.
pub fn parse_batch(step: u64, body: &str) -> Result<Vec<FeedItem>, FeedError> {
    serde_json::from_str(body).map_err(|source| FeedError::Decode { step, source })
}
