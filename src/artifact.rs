use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Result, SizeReportError};

/// Size metadata for one build artifact.
///
/// `path` is the identity key used for matching across builds. `name` is the
/// display label with the build hash suffix stripped; it may collide across
/// distinct paths without affecting matching. Field names stay camelCase on
/// the wire so snapshots from older runs keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    #[serde(default)]
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
    pub gzip_size: u64,
}

/// Build descriptors for every path, stat + compression running concurrently.
/// Results come back in input order regardless of completion order.
pub async fn paths_to_artifacts(paths: &[String]) -> Result<Vec<FileData>> {
    try_join_all(paths.iter().map(|path| build_descriptor(path))).await
}

async fn build_descriptor(path: &str) -> Result<FileData> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|source| SizeReportError::FileAccess {
            path: path.to_owned(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(SizeReportError::FileAccess {
            path: path.to_owned(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let bytes = fs::read(path)
        .await
        .map_err(|source| SizeReportError::FileAccess {
            path: path.to_owned(),
            source,
        })?;
    let gzip_size = gzip_size(&bytes).map_err(|source| SizeReportError::FileAccess {
        path: path.to_owned(),
        source,
    })?;

    Ok(FileData {
        name: display_name(path),
        path: path.to_owned(),
        size: metadata.len(),
        gzip_size,
    })
}

/// Gzipped byte count of `bytes` at best compression, the same level the
/// snapshots have always been recorded with.
pub fn gzip_size(bytes: &[u8]) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?.len() as u64)
}

/// Display label for an artifact path: the filename with everything from the
/// last hyphen stripped (`dist/app-abc123.js` -> `app`). Filenames without a
/// hyphen are kept whole. Tildes are escaped for markdown tables.
pub fn display_name(path: &str) -> String {
    let file_name = match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    };
    let stem = match file_name.rfind('-') {
        Some(i) => &file_name[..i],
        None => file_name,
    };
    stem.replace('~', "\\~")
}
