//
// lib.rs
// sizereport
//
// Library entry that re-exports modules so the binary and any external users can access CLI parsing, the diff engine, report formatting, and the GitHub collaborators.
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod artifact;
pub mod cli;
pub mod diff;
pub mod error;
pub mod publish;
pub mod rename;
pub mod report;
pub mod scanner;
pub mod snapshot;
pub mod utils;

pub use artifact::{paths_to_artifacts, FileData};
pub use diff::{get_changes, BuildChanges};
pub use error::{Result, SizeReportError};
pub use rename::{RenameResolver, SimilarityResolver};
pub use report::{render_changes, Report};
pub use scanner::expand_globs;
