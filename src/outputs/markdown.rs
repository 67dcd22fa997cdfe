//! Markdown rendering of a snapshot.
//!
//! Produces a single page with the latest strip first and then one section per
//! category showing its current page:
//!
//! ```text
//! # Curated News (2025/08/15)
//!
//! ## Latest
//!
//! ### [Title](https://example.com/a)
//! Summary
//!
//! <small>Science Daily · 今日</small>
//! ```
//!
//! Articles whose link is refused are rendered without a link and with a
//! notice, so a reader never follows a broken destination.

use super::file_date;
use crate::models::{ArticleView, Snapshot};
use crate::utils::slugify_title;
use std::error::Error;
use std::fmt::{self, Write};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Shown in place of a link that cannot be opened.
pub const LINK_UNAVAILABLE: &str = "_(リンクが無効なため開けません)_";

/// Render a [`Snapshot`] as Markdown.
pub fn snapshot_to_markdown(snapshot: &Snapshot<'_>) -> String {
    let mut md = String::new();
    // Writing to a String cannot fail.
    let _ = render(&mut md, snapshot);
    md
}

fn render(md: &mut String, snapshot: &Snapshot<'_>) -> fmt::Result {
    writeln!(md, "# Curated News ({})\n", snapshot.today)?;

    writeln!(md, "- [Latest](#latest)")?;
    for category in &snapshot.categories {
        writeln!(
            md,
            "- [{}](#{})",
            category.heading,
            slugify_title(category.heading)
        )?;
    }
    writeln!(md)?;

    writeln!(md, "## Latest\n")?;
    if snapshot.latest.is_empty() {
        writeln!(md, "_No recent articles._\n")?;
    }
    for view in &snapshot.latest {
        render_article(md, view)?;
    }

    for category in &snapshot.categories {
        writeln!(md, "## {}\n", category.heading)?;
        if category.articles.is_empty() {
            writeln!(md, "_No articles._\n")?;
        }
        for view in &category.articles {
            render_article(md, view)?;
        }
        writeln!(
            md,
            "<small>Page {} / {}</small>\n",
            category.current_page, category.total_pages
        )?;
    }
    Ok(())
}

fn render_article(md: &mut String, view: &ArticleView<'_>) -> fmt::Result {
    let article = view.article;
    match &view.link {
        Some(link) => writeln!(md, "### [{}]({})", article.title, link)?,
        None => writeln!(md, "### {} {}", article.title, LINK_UNAVAILABLE)?,
    }
    if !article.original_title.is_empty() {
        writeln!(md, "_{}_\n", article.original_title)?;
    }
    writeln!(md, "{}\n", article.summary)?;
    writeln!(
        md,
        "<small>{} · {}</small>\n",
        article.source, view.relative_date
    )
}

/// Write the rendered snapshot to `{markdown_output_dir}/{YYYY-MM-DD}.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_markdown(
    snapshot: &Snapshot<'_>,
    markdown_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = PathBuf::from(markdown_output_dir).join(format!("{}.md", file_date(snapshot)));
    fs::write(&path, snapshot_to_markdown(snapshot)).await?;
    info!(path = %path.display(), "Wrote Markdown page");
    Ok(path)
}
