//! httpsend core library
//!
//! This library implements a single-shot, fire-and-collect batch
//! fetcher: it GETs many target URLs concurrently, extracts selected
//! response elements (body text, headers, cookies), filters responses by
//! status code, and writes each retained element to its own file under a
//! per-run output directory.
//!
//! # Architecture
//!
//! - [`config`] - Run configuration, header specs, target sources
//! - [`filter`] - Status-code match/exclude filtering
//! - [`extract`] - Response-element extraction behind a transport trait
//! - [`output`] - Run-directory probing, path derivation, file sink
//! - [`dispatch`] - Concurrent fetch orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dispatch;
pub mod extract;
pub mod filter;
pub mod output;

// Re-export commonly used types
pub use config::{ConfigError, METHOD, RequestConfig, parse_header_spec, parse_target, read_targets};
pub use dispatch::{
    DEFAULT_CONCURRENCY, DispatchStats, EngineError, FetchError, FetchOutcome, HttpClient,
    RequestDispatcher,
};
pub use extract::{ElementSelector, ExtractError, ResponseParts, ResponseRecord, extract};
pub use filter::{CANONICAL_STATUS_CODES, StatusCodeSpec, retain};
pub use output::{OutputError, RUN_DIR_NAME, create_run_directory, element_path, save};
