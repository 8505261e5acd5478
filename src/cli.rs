//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use httpsend::{DEFAULT_CONCURRENCY, ElementSelector};

/// Send many HTTP requests and save response elements to files.
///
/// httpsend fetches every target URL concurrently, keeps the responses
/// that pass the status-code filter, and writes each selected response
/// element (body text, headers, cookies) to its own file under a fresh
/// run output directory.
#[derive(Parser, Debug)]
#[command(name = "httpsend")]
#[command(author, version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
pub struct Args {
    /// Target URL
    #[arg(short = 'u', value_name = "URL")]
    pub url: Option<String>,

    /// File with target URLs, one per line (a missing file is treated as
    /// a single target URL)
    #[arg(short = 'f', value_name = "FILE")]
    pub file: Option<String>,

    /// HTTP method to use (only GET is supported)
    #[arg(short = 'X', long = "method", default_value = "GET", value_parser = ["GET"])]
    pub method: String,

    /// HTTP element to save; all elements are saved by default
    #[arg(short = 'E', long = "element", value_enum, default_value = "all")]
    pub element: ElementSelector,

    /// Parent directory under which the run output directory is created
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Request headers as a comma-separated list of `Name: Value` pairs
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub header: Option<String>,

    /// Exclude HTTP status codes: comma-separated list or range,
    /// e.g. 200,300-400. Overrides --ms
    #[arg(long = "fs", visible_alias = "exclude-status", value_name = "CODES")]
    pub exclude_status: Option<String>,

    /// Match HTTP status codes: comma-separated list or range,
    /// e.g. 200,300-400
    #[arg(long = "ms", visible_alias = "match-status", value_name = "CODES")]
    pub match_status: Option<String>,

    /// Maximum concurrent fetches (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
