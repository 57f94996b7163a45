// ABOUTME: Error types for the extraction pipeline: ValidationError, ParseError, FetchError.
// ABOUTME: Display carries operator-facing detail; user_message() is the only user-facing surface.

use thiserror::Error;

/// Pre-network validation failures. Always raised before any request is
/// made and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input did not parse as an absolute URL.
    #[error("input is not an absolute URL")]
    InvalidUrl,

    /// The URL scheme is not https.
    #[error("URL scheme must be https")]
    InsecureScheme,

    /// The host is a loopback or private address.
    #[error("host is a loopback or private address")]
    BlockedHost,

    /// The host is not one of the supported source domains.
    #[error("host is not a supported source domain")]
    UnsupportedDomain,
}

impl ValidationError {
    /// Short, actionable message safe to show to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::InvalidUrl => "Enter a valid URL.",
            ValidationError::InsecureScheme => "Only https:// URLs are accepted.",
            ValidationError::BlockedHost => "That address cannot be fetched.",
            ValidationError::UnsupportedDomain => "This site is not supported.",
        }
    }
}

/// Failures while turning fetched content into a ParsedScenario.
///
/// A pattern extractor finding nothing is not an error; absent fields are a
/// normal outcome. These variants cover genuinely unusable content.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The page has no usable structured-data block; the title is mandatory.
    #[error("no structured data block found in page")]
    NoStructuredData,

    /// The response body is not the JSON shape the source promises.
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
}

/// The uniform failure type of the fetch-and-parse pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationError),

    /// The URL matched the API source but its path carries no project id.
    #[error("could not derive a project identifier from the URL path")]
    BadIdentifier,

    /// Non-2xx HTTP status from the source.
    #[error("unexpected HTTP status {0}")]
    Http(u16),

    /// Declared content length exceeds the response size cap.
    #[error("declared content length of {0} bytes exceeds the response size cap")]
    TooLarge(u64),

    /// The request hit the hard deadline and was aborted.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, TLS, reset, ...).
    #[error("transport failure")]
    Transport(#[source] reqwest::Error),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
}

impl FetchError {
    /// Short, actionable message safe to show to an end user. Never leaks
    /// raw error text or fragments of fetched content.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Invalid(e) => e.user_message(),
            FetchError::BadIdentifier => "This URL does not look like a scenario page.",
            FetchError::Http(_) => "The page could not be retrieved.",
            FetchError::TooLarge(_) => "The page is too large.",
            FetchError::Timeout => "The site took too long to respond.",
            FetchError::Transport(_) => "The site could not be reached.",
            FetchError::Parse(_) => "Couldn't read the page -- try entering the details manually.",
        }
    }

    /// Returns true if this failure was caught before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, FetchError::Invalid(_))
    }

    /// Returns true if the request was aborted by the deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }
}
