//! Output-path derivation and file persistence.
//!
//! Each invocation writes into its own run directory: a fixed name under
//! the chosen parent, probed with numeric suffixes until an unused
//! sibling is found. Within the run directory, every retained element of
//! every URL maps to one file named from the URL's host and path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

/// Fixed name of the per-run output directory.
pub const RUN_DIR_NAME: &str = "httpsend-output";

/// Upper bound on run-directory probing before giving up.
const MAX_RUN_DIR_PROBES: usize = 1000;

/// Errors raised while creating output directories or writing files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Filesystem operation failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Every probed run-directory name was already taken.
    #[error("no free run directory name under {parent} after {MAX_RUN_DIR_PROBES} probes")]
    RunDirExhausted {
        /// The parent directory that was probed.
        parent: PathBuf,
    },
}

impl OutputError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Creates the run output directory and returns its path.
///
/// The directory lives under `explicit_base` when given, otherwise under
/// the current working directory. The first free name in the sequence
/// `httpsend-output`, `httpsend-output1`, `httpsend-output2`, ... is
/// created. Each name is claimed with a single `create_dir` call, so the
/// returned directory is exclusively owned by this invocation even when
/// several runs race against the same parent. Called exactly once per
/// invocation, before any fetch starts; the result is fixed for the
/// whole run.
///
/// # Errors
///
/// Returns [`OutputError::Io`] when the working directory cannot be
/// resolved or the directory cannot be created, and
/// [`OutputError::RunDirExhausted`] when every probed name exists.
pub fn create_run_directory(explicit_base: Option<&Path>) -> Result<PathBuf, OutputError> {
    let base = match explicit_base {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().map_err(|e| OutputError::io(PathBuf::from("."), e))?,
    };
    std::fs::create_dir_all(&base).map_err(|e| OutputError::io(&base, e))?;

    let mut candidate = base.join(RUN_DIR_NAME);
    for probe in 1..=MAX_RUN_DIR_PROBES {
        // create_dir either claims the name atomically or reports that a
        // concurrent run (or an earlier one) already holds it.
        match std::fs::create_dir(&candidate) {
            Ok(()) => {
                debug!(path = %candidate.display(), "created run directory");
                return Ok(candidate);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                candidate = base.join(format!("{RUN_DIR_NAME}{probe}"));
            }
            Err(e) => return Err(OutputError::io(&candidate, e)),
        }
    }

    Err(OutputError::RunDirExhausted { parent: base })
}

/// Derives the output path for one element of one URL.
///
/// The stem is the URL's host (with the port when one is spelled out)
/// followed by its path with every `/` replaced by `_`; the suffix is
/// `.<method>.<element>`. Deterministic: identical inputs always yield
/// the identical path. Distinct URLs that normalize to the same stem
/// (same host and path, different query) collide and overwrite each
/// other; this is a documented last-writer-wins limitation, not
/// additional disambiguation territory.
#[must_use]
pub fn element_path(url: &Url, run_dir: &Path, method: &str, element: &str) -> PathBuf {
    let host = url.host_str().unwrap_or_default();
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = url.path().replace('/', "_");
    run_dir.join(format!("{host}{port}{path}.{method}.{element}"))
}

/// Writes one element payload to its output file.
///
/// # Errors
///
/// Returns [`OutputError::Io`] when the write fails.
pub async fn save(path: &Path, content: &str) -> Result<(), OutputError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| OutputError::io(path, e))
}
