use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, SizeReportError};

/// Expand artifact glob patterns into a list of regular-file paths.
///
/// Matches keep first-seen order and are deduplicated across patterns, so a
/// path covered by two globs yields one descriptor. Separators are
/// normalized to `/` to match the stored snapshot paths.
pub fn expand_globs(patterns: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let matches = glob::glob(pattern).map_err(|source| SizeReportError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    debug!("skipping unreadable glob match: {err}");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let normalized = path.to_string_lossy().replace('\\', "/");
            if seen.insert(normalized.clone()) {
                paths.push(normalized);
            }
        }
    }

    Ok(paths)
}
