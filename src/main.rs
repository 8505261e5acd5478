//! CLI entry point for httpsend.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use httpsend::{
    HttpClient, RequestConfig, RequestDispatcher, StatusCodeSpec, create_run_directory,
    parse_header_spec, read_targets,
};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // Malformed header specs collapse to an empty mapping; the run continues.
    let request_headers = match args.header.as_deref().map(parse_header_spec).transpose() {
        Ok(headers) => headers.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "malformed header spec, continuing without request headers");
            Vec::new()
        }
    };

    let config = Arc::new(RequestConfig {
        selector: args.element,
        request_headers,
        status_filter: StatusCodeSpec::new(args.exclude_status, args.match_status),
    });

    // clap guarantees exactly one source flag is present.
    let targets = match (&args.url, &args.file) {
        (Some(url), _) => vec![url.clone()],
        (None, Some(file)) => read_targets(file)?,
        (None, None) => anyhow::bail!("either -u URL or -f FILE is required"),
    };

    if targets.is_empty() {
        info!("target list is empty, nothing to fetch");
        return Ok(());
    }

    // The run directory is created once, before any fetch starts.
    let run_dir = create_run_directory(args.dir.as_deref())?;
    info!(
        run_dir = %run_dir.display(),
        targets = targets.len(),
        method = %args.method,
        "httpsend starting"
    );

    let client = HttpClient::new(&config.request_headers);
    let dispatcher = RequestDispatcher::new(usize::from(args.concurrency), Arc::clone(&config))?;

    let stats = dispatcher.dispatch(&targets, &client, &run_dir).await?;

    info!(
        saved = stats.saved(),
        filtered = stats.filtered(),
        failed = stats.failed(),
        invalid = stats.invalid(),
        total = stats.total(),
        "run complete"
    );

    Ok(())
}
