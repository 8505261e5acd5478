//! Request dispatcher: concurrent fan-out of single-shot GET fetches.
//!
//! The dispatcher spawns one Tokio task per valid target URL, admission
//! gated by a semaphore so a large target list cannot exhaust sockets or
//! file descriptors. Tasks share only the read-only [`RequestConfig`]
//! and the pooled HTTP client; every task reaches exactly one terminal
//! [`FetchOutcome`], and one task's failure never cancels or delays its
//! siblings.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::HttpClient;
use super::error::FetchError;
use crate::config::{METHOD, RequestConfig, parse_target};
use crate::extract::extract;
use crate::filter;
use crate::output::{element_path, save};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Error type for dispatcher construction and orchestration.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Terminal outcome of one fetch task.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The response passed the status filter; its elements were written.
    Saved {
        /// Response status code.
        status: u16,
        /// Paths of the files written, one per retained element.
        paths: Vec<PathBuf>,
    },
    /// The response was fetched but rejected by the status filter;
    /// nothing was written.
    Filtered {
        /// Response status code.
        status: u16,
    },
    /// The fetch, extraction, or write failed.
    Failed(FetchError),
}

/// Counters for a dispatch run.
///
/// Atomic so concurrent fetch tasks can update them without locking.
#[derive(Debug, Default)]
pub struct DispatchStats {
    saved: AtomicUsize,
    filtered: AtomicUsize,
    failed: AtomicUsize,
    invalid: AtomicUsize,
}

impl DispatchStats {
    /// Creates a stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of targets whose response was saved.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    /// Number of targets rejected by the status filter.
    #[must_use]
    pub fn filtered(&self) -> usize {
        self.filtered.load(Ordering::SeqCst)
    }

    /// Number of targets whose fetch failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Number of targets skipped before fetching (invalid URLs).
    #[must_use]
    pub fn invalid(&self) -> usize {
        self.invalid.load(Ordering::SeqCst)
    }

    /// Total number of targets that reached a terminal outcome.
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved() + self.filtered() + self.failed() + self.invalid()
    }

    fn increment_saved(&self) {
        self.saved.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::SeqCst);
    }
}

/// Concurrent dispatcher for a batch of target URLs.
///
/// # Concurrency model
///
/// - One Tokio task per valid target URL
/// - A semaphore permit is acquired before each task starts
/// - Permits release automatically when tasks finish (RAII)
/// - Tasks share no mutable state; the config is read-only behind an `Arc`
/// - The run is complete when every spawned task has settled
#[derive(Debug)]
pub struct RequestDispatcher {
    /// Semaphore gating task admission.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
    /// Shared request configuration.
    config: Arc<RequestConfig>,
}

impl RequestDispatcher {
    /// Creates a dispatcher with the given concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is
    /// outside the valid range (1-100).
    pub fn new(concurrency: usize, config: Arc<RequestConfig>) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, selector = ?config.selector, "creating dispatcher");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            config,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetches every target concurrently, persisting retained elements
    /// under `run_dir`.
    ///
    /// Invalid targets are skipped with a diagnostic before any task is
    /// spawned for them. Individual fetch failures never error this
    /// method; they are counted in the returned stats.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the admission
    /// semaphore is closed, which would indicate a bug.
    #[instrument(skip(self, targets, client), fields(targets = targets.len(), run_dir = %run_dir.display()))]
    pub async fn dispatch(
        &self,
        targets: &[String],
        client: &HttpClient,
        run_dir: &Path,
    ) -> Result<DispatchStats, EngineError> {
        let stats = Arc::new(DispatchStats::new());
        let mut handles = Vec::new();

        info!("starting dispatch");

        for raw in targets {
            let url = match parse_target(raw) {
                Ok(url) => url,
                Err(e) => {
                    warn!(target = %raw, error = %e, "skipping invalid target");
                    stats.increment_invalid();
                    continue;
                }
            };

            // Blocks while the concurrency limit is saturated.
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let config = Arc::clone(&self.config);
            let stats = Arc::clone(&stats);
            let run_dir = run_dir.to_path_buf();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when the task exits (RAII).
                let _permit = permit;

                match fetch_one(&client, &config, &url, &run_dir).await {
                    FetchOutcome::Saved { status, paths } => {
                        debug!(url = %url, status, files = paths.len(), "target saved");
                        stats.increment_saved();
                    }
                    FetchOutcome::Filtered { status } => {
                        info!(status, url = %url, "filtered");
                        stats.increment_filtered();
                    }
                    FetchOutcome::Failed(e) => {
                        warn!(url = %url, error = %e, "fetch failed");
                        stats.increment_failed();
                    }
                }
            }));
        }

        debug!(task_count = handles.len(), "waiting for fetches to settle");

        for handle in handles {
            // A panicking task is logged and counted, never propagated.
            if let Err(e) = handle.await {
                warn!(error = %e, "fetch task panicked");
                stats.increment_failed();
            }
        }

        info!(
            saved = stats.saved(),
            filtered = stats.filtered(),
            failed = stats.failed(),
            invalid = stats.invalid(),
            "dispatch complete"
        );

        // All tasks are done, so this Arc should be sole-owned. Fall back
        // to copying the counters if it somehow is not.
        match Arc::try_unwrap(stats) {
            Ok(stats) => Ok(stats),
            Err(arc_stats) => {
                let copy = DispatchStats::new();
                copy.saved.store(arc_stats.saved(), Ordering::SeqCst);
                copy.filtered.store(arc_stats.filtered(), Ordering::SeqCst);
                copy.failed.store(arc_stats.failed(), Ordering::SeqCst);
                copy.invalid.store(arc_stats.invalid(), Ordering::SeqCst);
                Ok(copy)
            }
        }
    }
}

/// Runs one target to its terminal outcome: fetch, extract, filter, and
/// persist.
async fn fetch_one(
    client: &HttpClient,
    config: &RequestConfig,
    url: &Url,
    run_dir: &Path,
) -> FetchOutcome {
    let response = match client.get(url).await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(e),
    };

    let record = match extract(config.selector, response).await {
        Ok(record) => record,
        Err(e) => return FetchOutcome::Failed(e.into()),
    };

    if !filter::retain(record.status, &config.status_filter) {
        return FetchOutcome::Filtered {
            status: record.status,
        };
    }

    let mut paths = Vec::new();
    for (element, content) in record.elements() {
        let path = element_path(url, run_dir, METHOD, element);
        if let Err(e) = save(&path, content).await {
            return FetchOutcome::Failed(e.into());
        }
        info!(status = record.status, path = %path.display(), "saved");
        paths.push(path);
    }

    FetchOutcome::Saved {
        status: record.status,
        paths,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::extract::ElementSelector;
    use crate::filter::StatusCodeSpec;

    fn test_config() -> Arc<RequestConfig> {
        Arc::new(RequestConfig {
            selector: ElementSelector::All,
            request_headers: Vec::new(),
            status_filter: StatusCodeSpec::default(),
        })
    }

    #[test]
    fn test_dispatcher_new_valid_concurrency() {
        let dispatcher = RequestDispatcher::new(1, test_config()).unwrap();
        assert_eq!(dispatcher.concurrency(), 1);

        let dispatcher = RequestDispatcher::new(100, test_config()).unwrap();
        assert_eq!(dispatcher.concurrency(), 100);
    }

    #[test]
    fn test_dispatcher_new_rejects_zero_concurrency() {
        let result = RequestDispatcher::new(0, test_config());
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_dispatcher_new_rejects_excessive_concurrency() {
        let result = RequestDispatcher::new(101, test_config());
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 101 })
        ));
    }

    #[test]
    fn test_default_concurrency_is_in_range() {
        assert!((MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&DEFAULT_CONCURRENCY));
    }

    #[test]
    fn test_dispatch_stats_increment_and_total() {
        let stats = DispatchStats::new();
        stats.increment_saved();
        stats.increment_saved();
        stats.increment_filtered();
        stats.increment_failed();
        stats.increment_invalid();

        assert_eq!(stats.saved(), 2);
        assert_eq!(stats.filtered(), 1);
        assert_eq!(stats.failed(), 1);
        assert_eq!(stats.invalid(), 1);
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_dispatch_stats_thread_safe() {
        use std::thread;

        let stats = Arc::new(DispatchStats::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    stats.increment_saved();
                    stats.increment_failed();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.saved(), 800);
        assert_eq!(stats.failed(), 800);
    }

    #[test]
    fn test_engine_error_display_names_bounds() {
        let msg = EngineError::InvalidConcurrency { value: 0 }.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains("1"));
        assert!(msg.contains("100"));
    }
}
