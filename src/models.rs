//! Data models for feed articles, categories, and the rendered snapshot.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One curated news item as read from the feed
//! - [`CategoryKey`]: The closed set of four category buckets
//! - [`FeedOrigin`]: Where the working article set came from
//! - [`Snapshot`]: Everything the presentation side needs for one render pass
//!
//! Article fields serialize in camelCase to match the column names the
//! presentation side already uses (`originalTitle`).

use crate::error::FeedError;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Decorative symbols allowed in category headings but ignored when matching.
static DECORATIVE_SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new("🤖|🌌|🧠|💡").expect("decorative symbol pattern is valid"));

/// A curated news item parsed from one feed row.
///
/// All fields are kept as the feed wrote them (trimmed and unquoted).
/// Dates in particular are not validated here; see [`crate::dates`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Publication date or date and time, in one of several textual forms.
    pub date: String,
    /// Publisher name.
    pub source: String,
    /// Title in the source language.
    pub original_title: String,
    /// Display title.
    pub title: String,
    /// Short description shown under the title.
    pub summary: String,
    /// Link to the full article.
    pub url: String,
    /// Category text, matched against [`CategoryKey::match_label`].
    pub category: String,
}

impl Article {
    /// Validated link to the full article.
    ///
    /// Only absolute `http`/`https` URLs are accepted; anything else is refused so
    /// the reader gets a notice instead of a broken destination.
    pub fn link(&self) -> Result<Url, FeedError> {
        let raw = self.url.trim();
        match Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
                Ok(parsed)
            }
            _ => Err(FeedError::InvalidLink(self.url.clone())),
        }
    }

    /// True if this article belongs to `key`'s category.
    pub fn is_in(&self, key: CategoryKey) -> bool {
        self.category.contains(key.match_label().as_str())
    }
}

/// The four fixed category buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    /// Biology and medicine
    Bio,
    /// Space and earth science
    Space,
    /// AI and technology
    Ai,
    /// Psychology and social science
    Psycho,
}

impl CategoryKey {
    /// Every category, in display order.
    pub const ALL: [CategoryKey; 4] = [
        CategoryKey::Bio,
        CategoryKey::Space,
        CategoryKey::Ai,
        CategoryKey::Psycho,
    ];

    /// Heading shown for the category, including its decorative symbol.
    pub fn heading(self) -> &'static str {
        match self {
            CategoryKey::Bio => "💡 バイオ・医学",
            CategoryKey::Space => "🌌 宇宙・地球科学",
            CategoryKey::Ai => "🤖 AI・テクノロジー",
            CategoryKey::Psycho => "🧠 心理・社会科学",
        }
    }

    /// Canonical label used for substring matching: the heading without symbols.
    pub fn match_label(self) -> String {
        DECORATIVE_SYMBOLS
            .replace_all(self.heading(), "")
            .trim()
            .to_string()
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CategoryKey::Bio => "bio",
            CategoryKey::Space => "space",
            CategoryKey::Ai => "ai",
            CategoryKey::Psycho => "psycho",
        };
        f.write_str(name)
    }
}

/// Where the working article set of a load came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedOrigin {
    /// Parsed from the configured feed.
    Remote,
    /// Replaced by the built-in sample articles.
    Fallback {
        /// Why the feed could not be used.
        reason: String,
    },
}

/// One article as handed to the presentation side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView<'a> {
    /// The article itself, flattened into the view.
    #[serde(flatten)]
    pub article: &'a Article,
    /// Human-friendly age such as `今日` or `3日前`.
    pub relative_date: String,
    /// Validated link, or `None` if the article must not be opened.
    pub link: Option<String>,
}

/// The current page of one category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageView<'a> {
    /// Category key.
    pub key: CategoryKey,
    /// Heading with decorative symbol.
    pub heading: &'static str,
    /// 1-indexed current page.
    pub current_page: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Articles on the current page.
    pub articles: Vec<ArticleView<'a>>,
}

/// Everything produced by one render pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    /// When the snapshot was built.
    pub generated_at: DateTime<Utc>,
    /// Today's date key in the feed's timezone (`YYYY/MM/DD`).
    pub today: String,
    /// Where the articles came from.
    pub origin: FeedOrigin,
    /// The latest strip.
    pub latest: Vec<ArticleView<'a>>,
    /// Current page of each category, in display order.
    pub categories: Vec<CategoryPageView<'a>>,
}
