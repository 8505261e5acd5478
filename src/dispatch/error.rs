//! Error types for the dispatch module.

use thiserror::Error;

use crate::extract::ExtractError;
use crate::output::OutputError;

/// Errors that can terminate a single fetch task.
///
/// Every variant is local to one target URL; none of them aborts sibling
/// tasks or the run as a whole.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS resolution, connection refused, TLS
    /// handshake, connection reset).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out before a response arrived.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Element extraction failed (body read/decode).
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A retained element could not be written to disk.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }
}

// No blanket `From<reqwest::Error>`: the network variant needs the URL
// for context, which the source error does not carry. Callers go through
// the constructor helpers instead.
