//! Status-code filtering for fetched responses.
//!
//! A response is retained when its status code survives the user's
//! match/exclude specs. A spec is a comma-separated list of tokens, each
//! either a single code (`404`) or an inclusive range (`300-400`, bounds in
//! either order). The match spec narrows the universe of retained codes;
//! the exclude spec is subtracted afterwards, so exclusion always wins on
//! overlap.
//!
//! Only codes from the canonical registry of standard HTTP status codes
//! participate: a non-canonical code is never retained, and spec tokens
//! naming one are inert.

use tracing::debug;

/// Canonical registry of standard HTTP status codes, sorted ascending.
///
/// Codes outside this set are neither matched nor excluded; they are
/// simply never retained.
pub const CANONICAL_STATUS_CODES: &[u16] = &[
    100, 101, 102, 103, // informational
    200, 201, 202, 203, 204, 205, 206, 207, 208, 226, // success
    300, 301, 302, 303, 304, 305, 307, 308, // redirection
    400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417,
    418, 421, 422, 423, 424, 425, 426, 428, 429, 431, 451, // client error
    500, 501, 502, 503, 504, 505, 506, 507, 508, 510, 511, // server error
];

/// Returns whether `code` is a standard HTTP status code.
#[must_use]
pub fn is_canonical(code: u16) -> bool {
    CANONICAL_STATUS_CODES.binary_search(&code).is_ok()
}

/// User-supplied status-code filter: an optional exclude spec and an
/// optional match spec, both kept as raw comma-separated token strings.
///
/// Constructed once at startup and shared read-only across all fetch
/// tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCodeSpec {
    /// Codes to reject. Always overrides `matches`.
    exclude: Option<String>,
    /// Codes to retain. Absent means match-all.
    matches: Option<String>,
}

impl StatusCodeSpec {
    /// Creates a spec from raw expression strings.
    ///
    /// Blank expressions are normalized to absent, so an empty `--ms`
    /// behaves like no match spec at all (retain every canonical code).
    #[must_use]
    pub fn new(exclude: Option<String>, matches: Option<String>) -> Self {
        Self {
            exclude: exclude.filter(|expr| !expr.trim().is_empty()),
            matches: matches.filter(|expr| !expr.trim().is_empty()),
        }
    }

    /// Returns true when neither spec is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exclude.is_none() && self.matches.is_none()
    }
}

/// Decides whether a response with `code` is retained under `spec`.
///
/// Equivalent to the set formulation: start from the canonical universe,
/// intersect with the match expansion (when present), subtract the
/// exclude expansion (when present), then test membership. Membership is
/// evaluated directly against the raw token lists so the universe is
/// never re-materialized per call.
#[must_use]
pub fn retain(code: u16, spec: &StatusCodeSpec) -> bool {
    if !is_canonical(code) {
        return false;
    }

    if let Some(expr) = spec.exclude.as_deref()
        && expr_contains(expr, code)
    {
        return false;
    }

    match spec.matches.as_deref() {
        Some(expr) => expr_contains(expr, code),
        None => true,
    }
}

/// Tests whether any token of a spec expression covers `code`.
///
/// Malformed tokens are dropped silently (with a debug event); they never
/// fail the run.
fn expr_contains(expr: &str, code: u16) -> bool {
    expr.split(',')
        .filter_map(parse_token)
        .any(|(low, high)| (low..=high).contains(&code))
}

/// Parses one spec token into a normalized inclusive `(low, high)` range.
///
/// Single codes become degenerate ranges; reversed bounds (`400-300`) are
/// swapped. Returns `None` for tokens that do not parse as integers.
fn parse_token(token: &str) -> Option<(u16, u16)> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let parsed = match token.split_once('-') {
        Some((a, b)) => a
            .trim()
            .parse::<u16>()
            .ok()
            .zip(b.trim().parse::<u16>().ok())
            .map(|(a, b)| (a.min(b), a.max(b))),
        None => token.parse::<u16>().ok().map(|c| (c, c)),
    };

    if parsed.is_none() {
        debug!(token, "dropping malformed status-code token");
    }
    parsed
}
