//! Run configuration: request settings shared by all fetch tasks, header
//! spec parsing, and target-list resolution.

use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::extract::ElementSelector;
use crate::filter::StatusCodeSpec;

/// The one HTTP method this tool supports.
pub const METHOD: &str = "GET";

/// Request settings shared read-only by every fetch task.
///
/// Constructed once at startup and never mutated afterwards, so an `Arc`
/// of it is safe for concurrent access without locking.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Which response elements to extract and persist.
    pub selector: ElementSelector,
    /// Request headers applied to every fetch.
    pub request_headers: Vec<(String, String)>,
    /// Status-code filter applied to every response.
    pub status_filter: StatusCodeSpec,
}

/// Errors raised while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A header token did not parse as a `Name: Value` pair.
    #[error("malformed header token {token:?}: expected `Name: Value`")]
    MalformedHeader {
        /// The offending token.
        token: String,
    },

    /// The target-list file exists but could not be read.
    #[error("failed to read target list {path}: {source}")]
    TargetList {
        /// The list file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A target failed URL validation.
    #[error("invalid target URL {target:?}: {reason}")]
    InvalidTarget {
        /// The raw target string.
        target: String,
        /// Why validation rejected it.
        reason: String,
    },
}

impl ConfigError {
    fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Parses a comma-separated `Name: Value` header spec into pairs.
///
/// All-or-nothing: any token without a colon or with an empty name fails
/// the whole spec, and the caller falls back to an empty header map. No
/// partial header set is ever kept. Values may themselves contain colons.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedHeader`] naming the first bad token.
pub fn parse_header_spec(spec: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut headers = Vec::new();
    for token in spec.split(',') {
        let Some((name, value)) = token.split_once(':') else {
            return Err(ConfigError::MalformedHeader {
                token: token.to_string(),
            });
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::MalformedHeader {
                token: token.to_string(),
            });
        }
        headers.push((name.to_string(), value.trim().to_string()));
    }
    Ok(headers)
}

/// Resolves the `-f` argument into a list of raw targets.
///
/// When the path resolves to a readable file, its non-blank lines are the
/// targets. When the path does not exist, the argument string itself is
/// reinterpreted as a single target URL; this fallback is logged loudly
/// because it can also mask a typo in a list path.
///
/// # Errors
///
/// Returns [`ConfigError::TargetList`] for read failures other than the
/// file being absent.
pub fn read_targets(source: &str) -> Result<Vec<String>, ConfigError> {
    match std::fs::read_to_string(source) {
        Ok(contents) => {
            let targets: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect();
            debug!(path = source, targets = targets.len(), "read target list");
            Ok(targets)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                target = source,
                "target list file not found; treating the argument as a single URL"
            );
            Ok(vec![source.to_string()])
        }
        Err(e) => Err(ConfigError::TargetList {
            path: PathBuf::from(source),
            source: e,
        }),
    }
}

/// Validates one raw target as an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTarget`] for malformed URLs, non-HTTP
/// schemes, and URLs without a host.
pub fn parse_target(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid_target(raw, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid_target(
            raw,
            format!("unsupported scheme {:?}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::invalid_target(raw, "missing host"));
    }

    Ok(url)
}
