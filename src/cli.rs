use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::publish::IssueCoords;
use crate::rename::{self, RenameResolver};

#[derive(Parser, Debug)]
#[command(author, version, about = "Report build size changes on pull requests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record the current build sizes to a local snapshot file
    Check(CheckArgs),
    /// Diff the current build against the previous snapshot and publish the report
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Glob patterns matching the build artifacts (can be repeated or comma separated)
    #[arg(required = true, value_delimiter = ',', num_args = 1..)]
    pub files: Vec<String>,

    /// Path of the snapshot file to write
    #[arg(short, long, default_value = "buildsize.json")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Glob patterns matching the build artifacts (can be repeated or comma separated)
    #[arg(required = true, value_delimiter = ',', num_args = 1..)]
    pub files: Vec<String>,

    /// Repository in owner/name form
    #[arg(long)]
    pub repo: String,

    /// Pull request number (falls back to the PR_NUMBER environment variable)
    #[arg(long)]
    pub pr: Option<u64>,

    /// Branch the previous snapshot was recorded on
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// URL of the previous build snapshot; a `{branch}` placeholder is substituted
    #[arg(long)]
    pub snapshot_url: String,

    /// Rename resolution strategy (`similarity` or `similarity:<threshold>`)
    #[arg(long)]
    pub find_renamed: Option<String>,
}

/// Validated configuration for the report flow.
pub struct ReportOptions {
    pub patterns: Vec<String>,
    pub issue: IssueCoords,
    pub branch: String,
    pub snapshot_url: String,
    pub token: String,
    pub resolver: Option<Box<dyn RenameResolver>>,
}

pub fn build_report_options(args: ReportArgs) -> Result<ReportOptions> {
    let (owner, repo) = args
        .repo
        .split_once('/')
        .with_context(|| format!("--repo must be owner/name, got {}", args.repo))?;

    let number = match args.pr {
        Some(number) => number,
        None => std::env::var("PR_NUMBER")
            .context("no --pr flag and PR_NUMBER is unset")?
            .parse()
            .context("PR_NUMBER is not a number")?,
    };

    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is unset")?;

    let resolver = args
        .find_renamed
        .as_deref()
        .map(rename::from_strategy)
        .transpose()?;

    Ok(ReportOptions {
        patterns: args.files,
        issue: IssueCoords {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        },
        branch: args.branch,
        snapshot_url: args.snapshot_url,
        token,
        resolver,
    })
}
