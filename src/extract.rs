//! Response-element extraction.
//!
//! A fetched response is reduced to a [`ResponseRecord`] holding only the
//! elements the user selected: body text, a newline-delimited header
//! block, and a cookie block. Extraction consumes the response body,
//! since the transport discards it once the response object is dropped.
//!
//! The extractor is transport-agnostic: it operates on any
//! [`ResponseParts`] implementation, so unit tests can drive it with an
//! in-memory fake instead of a live connection.

use clap::ValueEnum;
use thiserror::Error;

/// Which response elements to retain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElementSelector {
    /// Decoded response body text.
    Text,
    /// Response headers as `Name: Value` lines.
    Headers,
    /// Response cookies as a descriptive text block.
    Cookies,
    /// All of the above.
    All,
}

impl ElementSelector {
    fn wants_text(self) -> bool {
        matches!(self, Self::Text | Self::All)
    }

    fn wants_headers(self) -> bool {
        matches!(self, Self::Headers | Self::All)
    }

    fn wants_cookies(self) -> bool {
        matches!(self, Self::Cookies | Self::All)
    }
}

/// Errors raised while extracting elements from a response.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The response body could not be read or decoded.
    #[error("failed to decode response body: {reason}")]
    BodyDecode {
        /// Description of the underlying transport/decode failure.
        reason: String,
    },
}

impl ExtractError {
    /// Creates a body-decode error.
    pub fn body_decode(reason: impl Into<String>) -> Self {
        Self::BodyDecode {
            reason: reason.into(),
        }
    }
}

/// The capability set extraction needs from a response: status, header
/// text, cookie text, and the decoded body.
///
/// The body accessor takes `self` by value because reading the body
/// consumes the underlying transport object.
#[allow(async_fn_in_trait)]
pub trait ResponseParts: Send + Sized {
    /// The HTTP status code of the response.
    fn status_code(&self) -> u16;

    /// All response headers serialized as newline-delimited
    /// `Name: Value` lines. Empty string when there are none.
    fn headers_text(&self) -> String;

    /// All response cookies serialized as a descriptive text block.
    /// Empty string when the response set no cookies.
    fn cookies_text(&self) -> String;

    /// Reads and decodes the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::BodyDecode`] when the body cannot be read.
    async fn body_text(self) -> Result<String, ExtractError>;
}

/// One fetched response reduced to its selected elements.
///
/// Built exactly once per fetch and never mutated afterwards. An element
/// whose extracted value is the empty string is omitted entirely
/// (absence over emptiness): a response with no cookies produces no
/// cookies entry, and no empty file is ever written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// HTTP status code; always present.
    pub status: u16,
    /// Header block, when selected and non-empty.
    pub headers: Option<String>,
    /// Cookie block, when selected and non-empty.
    pub cookies: Option<String>,
    /// Body text, when selected and non-empty.
    pub text: Option<String>,
}

impl ResponseRecord {
    /// Iterates the present elements as `(element name, content)` pairs,
    /// in a fixed order. Element names become output-path suffixes.
    pub fn elements(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("headers", self.headers.as_deref()),
            ("cookies", self.cookies.as_deref()),
            ("text", self.text.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    /// Returns true when no element survived extraction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_none() && self.cookies.is_none() && self.text.is_none()
    }
}

/// Extracts the selected elements from a response into a
/// [`ResponseRecord`], consuming the response.
///
/// # Errors
///
/// Returns [`ExtractError::BodyDecode`] when the body is selected and
/// cannot be read. Header and cookie serialization never fail.
pub async fn extract<R: ResponseParts>(
    selector: ElementSelector,
    response: R,
) -> Result<ResponseRecord, ExtractError> {
    let status = response.status_code();

    let headers = selector
        .wants_headers()
        .then(|| response.headers_text())
        .filter(|block| !block.is_empty());
    let cookies = selector
        .wants_cookies()
        .then(|| response.cookies_text())
        .filter(|block| !block.is_empty());

    // Body last: reading it consumes the response.
    let text = if selector.wants_text() {
        let body = response.body_text().await?;
        (!body.is_empty()).then_some(body)
    } else {
        None
    };

    Ok(ResponseRecord {
        status,
        headers,
        cookies,
        text,
    })
}
