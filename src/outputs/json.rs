//! JSON output for the scraped record.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::ScrapeError;
use crate::models::ScrapeResult;
use crate::utils::ensure_writable_dir;

/// Serialize the record, pretty-printed or compact.
pub fn to_json(result: &ScrapeResult, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

/// Path of the record file: `{dir}/{YYYY-MM-DD}/mars_{HH-MM-SS}.json`.
pub fn output_path(json_output_dir: &str, at: &DateTime<Local>) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(at.format("%Y-%m-%d").to_string())
        .join(format!("mars_{}.json", at.format("%H-%M-%S")))
}

/// Write the record under `json_output_dir`, named after its `last_modified`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_result(
    result: &ScrapeResult,
    json_output_dir: &str,
) -> Result<PathBuf, ScrapeError> {
    let json = to_json(result, true)?;
    let path = output_path(json_output_dir, &result.last_modified);

    if let Some(dir) = path.parent().and_then(|p| p.to_str()) {
        info!(%dir, "Ensuring JSON directory exists");
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(%dir, error = %e, "JSON directory is not writable");
            return Err(e);
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON result");
    Ok(path)
}
