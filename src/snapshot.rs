use std::io;
use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::artifact::{display_name, FileData};
use crate::error::{Result, SizeReportError};

/// Substitute the `{branch}` placeholder in a snapshot URL template.
pub fn resolve_snapshot_url(template: &str, branch: &str) -> String {
    template.replace("{branch}", branch)
}

/// Fetch the previous build's artifact records from a remote JSON document.
///
/// Any failure here (network, status, parse) is the recoverable
/// `PreviousSnapshotUnavailable`: the caller logs it and skips the report.
/// Records missing the optional `name` field get one re-derived from the
/// path.
pub async fn fetch_previous(url: &str) -> Result<Vec<FileData>> {
    let response = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| SizeReportError::PreviousSnapshotUnavailable(err.to_string()))?;

    let mut records: Vec<FileData> = response
        .json()
        .await
        .map_err(|err| SizeReportError::PreviousSnapshotUnavailable(err.to_string()))?;

    for record in &mut records {
        if record.name.is_empty() {
            record.name = display_name(&record.path);
        }
    }
    Ok(records)
}

/// Write the current artifact set as JSON for a future run to diff against.
pub async fn write_snapshot(path: &Path, artifacts: &[FileData]) -> Result<()> {
    let json = serde_json::to_vec(artifacts).map_err(|err| SizeReportError::SnapshotWrite {
        path: path.to_path_buf(),
        source: io::Error::other(err),
    })?;
    fs::write(path, json)
        .await
        .map_err(|source| SizeReportError::SnapshotWrite {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "wrote build size snapshot");
    Ok(())
}
