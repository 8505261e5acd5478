//! Concurrent request-dispatch pipeline.
//!
//! This module ties the fetch pipeline together: the [`HttpClient`]
//! issues single-shot GET requests, the [`RequestDispatcher`] fans one
//! task out per target URL under a semaphore-bounded concurrency limit,
//! and each task settles into a tagged [`FetchOutcome`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use httpsend::{
//!     ElementSelector, HttpClient, RequestConfig, RequestDispatcher, StatusCodeSpec,
//!     create_run_directory,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(RequestConfig {
//!     selector: ElementSelector::All,
//!     request_headers: Vec::new(),
//!     status_filter: StatusCodeSpec::default(),
//! });
//! let client = HttpClient::new(&config.request_headers);
//! let dispatcher = RequestDispatcher::new(50, Arc::clone(&config))?;
//! let run_dir = create_run_directory(None)?;
//! let targets = vec!["https://example.com".to_string()];
//! let stats = dispatcher.dispatch(&targets, &client, &run_dir).await?;
//! println!("saved: {}, filtered: {}", stats.saved(), stats.filtered());
//! # Ok(())
//! # }
//! ```

mod client;
mod engine;
mod error;

pub use client::{CONNECT_TIMEOUT_SECS, HttpClient, LiveResponse, READ_TIMEOUT_SECS};
pub use engine::{
    DEFAULT_CONCURRENCY, DispatchStats, EngineError, FetchOutcome, RequestDispatcher,
};
pub use error::FetchError;
