use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sizereport::artifact::paths_to_artifacts;
use sizereport::cli::{build_report_options, CheckArgs, Cli, Command, ReportArgs};
use sizereport::diff::get_changes;
use sizereport::publish::GithubClient;
use sizereport::report::render_changes;
use sizereport::scanner::expand_globs;
use sizereport::snapshot::{fetch_previous, resolve_snapshot_url, write_snapshot};
use sizereport::utils::pretty_bytes;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => run_check(args).await,
        Command::Report(args) => run_report(args).await,
    }
}

async fn run_check(args: CheckArgs) -> Result<()> {
    let paths = expand_globs(&args.files)?;
    let artifacts = paths_to_artifacts(&paths).await?;
    info!(count = artifacts.len(), "measured build artifacts");
    write_snapshot(&args.out, &artifacts).await?;
    Ok(())
}

async fn run_report(args: ReportArgs) -> Result<()> {
    let opts = build_report_options(args)?;

    let paths = expand_globs(&opts.patterns)?;
    let artifacts = paths_to_artifacts(&paths).await?;

    // Trace intermediate state before any network write so a failed publish
    // still leaves the numbers in the build log.
    println!("=== Build Size ===");
    for artifact in &artifacts {
        println!(
            "{}  {}  ({} gzipped)",
            artifact.path,
            pretty_bytes(artifact.size),
            pretty_bytes(artifact.gzip_size)
        );
    }

    let url = resolve_snapshot_url(&opts.snapshot_url, &opts.branch);
    let previous = match fetch_previous(&url).await {
        Ok(previous) => previous,
        Err(err) => {
            warn!("couldn't fetch previous build info, skipping report: {err}");
            return Ok(());
        }
    };

    let changes = get_changes(&previous, &artifacts, opts.resolver.as_deref()).await?;
    let report = render_changes(&changes);
    let body = report.to_markdown();

    println!("=== Changes ===");
    println!("{body}");

    let client = GithubClient::new(opts.token)?;
    client.publish_report(&opts.issue, &body).await?;
    info!(
        pr = opts.issue.number,
        repo = %format!("{}/{}", opts.issue.owner, opts.issue.repo),
        "size report published"
    );
    Ok(())
}
