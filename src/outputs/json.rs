//! JSON output for the page.
//!
//! The snapshot is written to `{json_output_dir}/{YYYY-MM-DD}/news.json`, where
//! the date is today in the feed's timezone. Re-running on the same day
//! overwrites the file.

use super::file_date;
use crate::models::Snapshot;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Snapshot`] as pretty-printed JSON and return the file path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &Snapshot<'_>,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(file_date(snapshot));
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join("news.json");
    fs::write(&path, json).await?;
    info!(
        path = %path.display(),
        latest = snapshot.latest.len(),
        "Wrote JSON snapshot"
    );
    Ok(path)
}
