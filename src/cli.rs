//! Command-line interface definitions for Curated News.
//!
//! All options can be given as flags; the feed URL can also come from the
//! environment or the YAML config file.

use crate::index::Direction;
use crate::models::CategoryKey;
use clap::{Parser, ValueEnum};

/// Command-line arguments for the Curated News application.
///
/// # Examples
///
/// ```sh
/// # Render the built-in sample articles
/// curated_news -j ./json
///
/// # Render a published feed, with Markdown, and open page 2 of AI
/// curated_news -j ./json -m ./markdown \
///     --feed-url https://docs.google.com/spreadsheets/d/e/.../pub?output=csv \
///     --page ai:+1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON snapshot
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown page
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// URL of the published CSV feed (overrides the config file)
    #[arg(long, env = "NEWS_FEED_URL")]
    pub feed_url: Option<String>,

    /// Read the feed from a local file; takes precedence over any URL
    #[arg(long)]
    pub feed_file: Option<String>,

    /// Move a category one page before writing output, as `<category>:<+1|-1>`.
    /// Repeatable; moves are applied in order.
    #[arg(long = "page", value_name = "CATEGORY:DELTA", value_parser = parse_page_move)]
    pub pages: Vec<PageMove>,
}

/// One requested page move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMove {
    pub key: CategoryKey,
    pub direction: Direction,
}

/// Parse `ai:+1`, `bio:-1`, or `space:1` into a [`PageMove`].
fn parse_page_move(s: &str) -> Result<PageMove, String> {
    let (name, delta) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <category>:<+1|-1>, got {s:?}"))?;
    let key = <CategoryKey as ValueEnum>::from_str(name.trim(), true)?;
    let delta: i32 = delta
        .trim()
        .parse()
        .map_err(|_| format!("invalid page delta {delta:?}"))?;
    let direction =
        Direction::from_delta(delta).ok_or_else(|| format!("page delta must be +1 or -1, got {delta}"))?;
    Ok(PageMove { key, direction })
}
