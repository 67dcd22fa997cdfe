//! # Curated News
//!
//! Fetches a hand-curated science news feed (a published spreadsheet exported
//! as comma-separated text) and prepares it for the site: a "latest" strip and
//! four paginated category lists.
//!
//! ## Usage
//!
//! ```sh
//! curated_news -j ./json -m ./markdown --feed-url https://example.com/feed.csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Loading**: One fetch of the feed; the built-in sample articles stand in
//!    if it fails or has no usable rows
//! 2. **Parsing**: Rows become typed [`models::Article`] records
//! 3. **Indexing**: Articles are dated, sorted, and split into categories and pages
//! 4. **Output**: A JSON snapshot and an optional Markdown page

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod dates;
mod error;
mod feed;
mod index;
mod models;
mod outputs;
mod parser;
mod utils;

use cli::Cli;
use config::{load_config, Config};
use feed::{load_articles, Feed, FileFeed, HttpFeed};
use index::CategoryIndex;
use outputs::{build_snapshot, json, markdown};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("curated_news starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.config, "Parsed CLI arguments");

    // Early check: ensure JSON output dir is writable
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(url) = &args.feed_url {
        config.feed_url = Some(url.clone());
    }
    config.validate()?;
    let normalizer = config.normalizer()?;
    let settings = config.index_settings();

    // ---- Load feed ----
    let feed = select_feed(&args, &config)?;
    let load = load_articles(&feed).await;
    info!(count = load.articles.len(), origin = ?load.origin, "Articles loaded");

    // ---- Index ----
    let now = Utc::now();
    let mut index = CategoryIndex::build(&load.articles, &normalizer, &settings, now);
    for page in &args.pages {
        if !index.change_page(page.key, page.direction) {
            warn!(category = %page.key, direction = ?page.direction, "Page move out of range; ignored");
        }
    }

    // ---- Output ----
    let snapshot = build_snapshot(&index, load.origin, &normalizer, now);
    let json_path = json::write_snapshot(&snapshot, &args.json_output_dir).await?;

    if let Some(dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_markdown(&snapshot, dir).await {
            error!(path = %dir, error = %e, "Failed writing Markdown");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        json = %json_path.display(),
        latest = snapshot.latest.len(),
        "Execution complete"
    );

    Ok(())
}

/// Pick the feed source: a file beats a URL, and neither means fallback data.
fn select_feed(args: &Cli, config: &Config) -> Result<Feed, Box<dyn Error>> {
    if let Some(path) = &args.feed_file {
        info!(%path, "Reading feed from file");
        return Ok(Feed::File(FileFeed::new(path)));
    }
    match &config.feed_url {
        Some(url) => {
            info!(%url, "Fetching feed from URL");
            Ok(Feed::Http(HttpFeed::new(url.as_str(), &config.user_agent)?))
        }
        None => {
            warn!("No feed URL or file configured");
            Ok(Feed::Unconfigured)
        }
    }
}
