//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock behaviour: a UTC+9 feed, 20 articles per page, 100 per category, and
//! a 7-day / 20-article fallback window for the latest strip.
//!
//! ```yaml
//! feed_url: https://docs.google.com/spreadsheets/d/e/.../pub?output=csv
//! utc_offset_hours: 9
//! page_size: 20
//! ```

use crate::dates::DateNormalizer;
use crate::error::FeedError;
use crate::index::IndexSettings;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{info, instrument};

/// Longest accepted recent window (about a century).
pub const MAX_RECENT_DAYS: i64 = 36_500;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Published CSV endpoint of the feed.
    pub feed_url: Option<String>,
    /// UTC offset the feed is authored in.
    pub utc_offset_hours: i32,
    /// Articles per category page.
    pub page_size: usize,
    /// Most articles kept per category.
    pub category_limit: usize,
    /// Length of the "recent" window used when nothing is dated today.
    pub recent_days: i64,
    /// Most articles shown from the recent window.
    pub recent_limit: usize,
    /// `User-Agent` sent with the feed request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: None,
            utc_offset_hours: 9,
            page_size: 20,
            category_limit: 100,
            recent_days: 7,
            recent_limit: 20,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Check values that would otherwise break pagination or date handling.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.page_size == 0 {
            return Err(FeedError::InvalidConfig("page_size must be at least 1".into()));
        }
        if !(0..=MAX_RECENT_DAYS).contains(&self.recent_days) {
            return Err(FeedError::InvalidConfig(format!(
                "recent_days must be between 0 and {MAX_RECENT_DAYS}"
            )));
        }
        DateNormalizer::new(self.utc_offset_hours)?;
        Ok(())
    }

    /// Date normalizer for the configured offset.
    pub fn normalizer(&self) -> Result<DateNormalizer, FeedError> {
        DateNormalizer::new(self.utc_offset_hours)
    }

    /// Pagination and latest-strip limits.
    pub fn index_settings(&self) -> IndexSettings {
        IndexSettings {
            page_size: self.page_size,
            category_limit: self.category_limit,
            recent_days: self.recent_days,
            recent_limit: self.recent_limit,
        }
    }
}

/// Read and validate a YAML config file.
#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    info!(?config.feed_url, config.page_size, "Loaded configuration");
    Ok(config)
}

/// Parse and validate YAML config text. An empty document yields the defaults.
pub fn parse_config(text: &str) -> Result<Config, Box<dyn Error>> {
    let config = if text.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str::<Config>(text)?
    };
    config.validate()?;
    Ok(config)
}
