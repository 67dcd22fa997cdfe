//! Output generation for the presentation side.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`Snapshot`] as a JSON file for the page to consume
//! - [`markdown`]: Renders the same snapshot as a readable Markdown page
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-08-15/
//!     └── news.json
//!
//! markdown_output_dir/
//! └── 2025-08-15.md
//! ```

pub mod json;
pub mod markdown;

use crate::dates::DateNormalizer;
use crate::index::CategoryIndex;
use crate::models::{Article, ArticleView, CategoryKey, CategoryPageView, FeedOrigin, Snapshot};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Assemble everything one render pass needs from the index.
pub fn build_snapshot<'a>(
    index: &'a CategoryIndex,
    origin: FeedOrigin,
    normalizer: &DateNormalizer,
    now: DateTime<Utc>,
) -> Snapshot<'a> {
    let view = |article: &'a Article| article_view(article, normalizer, now);

    let categories = CategoryKey::ALL
        .iter()
        .map(|&key| {
            let page = index.category_page(key);
            CategoryPageView {
                key,
                heading: key.heading(),
                current_page: page.current_page,
                total_pages: page.total_pages,
                articles: page.articles.iter().map(view).collect(),
            }
        })
        .collect();

    Snapshot {
        generated_at: now,
        today: normalizer.today_key(now),
        origin,
        latest: index.latest_articles().iter().map(view).collect(),
        categories,
    }
}

fn article_view<'a>(
    article: &'a Article,
    normalizer: &DateNormalizer,
    now: DateTime<Utc>,
) -> ArticleView<'a> {
    let link = match article.link() {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!(title = %article.title, error = %e, "Article link refused");
            None
        }
    };
    ArticleView {
        article,
        relative_date: normalizer.relative_label(&article.date, now),
        link,
    }
}

/// Date part of the snapshot's today key, usable in file names (`YYYY-MM-DD`).
pub fn file_date(snapshot: &Snapshot<'_>) -> String {
    snapshot.today.replace('/', "-")
}
