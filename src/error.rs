use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using SizeReportError
pub type Result<T> = std::result::Result<T, SizeReportError>;

/// Error taxonomy for the size reporting pipeline.
///
/// `PreviousSnapshotUnavailable` is the only recoverable variant: the report
/// flow logs it and stops without publishing. Everything else aborts the run.
#[derive(Debug, Error)]
pub enum SizeReportError {
    /// An artifact path could not be read or is not a regular file.
    #[error("cannot read artifact {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A rename resolver returned a path outside the candidate set.
    #[error("rename target isn't part of the new build: {0}")]
    InvalidRenameTarget(String),

    #[error("previous build snapshot unavailable: {0}")]
    PreviousSnapshotUnavailable(String),

    /// One of the comment-publishing steps failed. Not recovered locally.
    #[error("publish step `{step}` failed: {source}")]
    Publish {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid artifact glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot write build snapshot {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
