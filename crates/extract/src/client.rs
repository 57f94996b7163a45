// ABOUTME: The fetch orchestrator: validates a URL, dispatches to the matching source,
// ABOUTME: performs the single bounded network fetch, and returns a uniform outcome.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::ACCEPT;
use url::Url;

use crate::error::FetchError;
use crate::scenario::{ParsedScenario, SourceKind};
use crate::sources::{booth, talto};
use crate::validator::{validate, ValidatedUrl};

/// Maximum declared response size (5 MiB). The content-length header is
/// checked before the body is read; responses that declare no length are
/// read in full. Residual gap carried from the original behavior.
pub const MAX_CONTENT_LENGTH: u64 = 5 * 1024 * 1024;

/// Hard deadline for the single network round trip. The in-flight request
/// is aborted on expiry, not merely ignored.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = "scandex/0.1 (scenario metadata importer)";
const TALTO_API_BASE: &str = "https://talto.cc/api/v1/projects/";

static TALTO_PROJECT_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/projects/([A-Za-z0-9_-]+)/?$").unwrap());

/// Configuration for the pipeline client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    /// Override for the host the markup source is fetched from. The input
    /// URL is still validated against the real whitelist; only the outgoing
    /// request is redirected. Used by tests and proxy deployments.
    pub booth_base: Option<Url>,
    /// Base of the project API endpoint; the project id is appended.
    pub talto_api_base: Url,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            booth_base: None,
            talto_api_base: Url::parse(TALTO_API_BASE).expect("default API base is a valid URL"),
        }
    }
}

/// Builder for constructing a [`Client`] with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Redirect markup-source fetches to a different base URL.
    pub fn booth_base(mut self, base: Url) -> Self {
        self.opts.booth_base = Some(base);
        self
    }

    /// Point the API-source endpoint at a different base URL.
    pub fn talto_api_base(mut self, base: Url) -> Self {
        self.opts.talto_api_base = base;
        self
    }

    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

/// The extraction pipeline client. Stateless across invocations; safe to
/// share and call concurrently.
pub struct Client {
    opts: Options,
    http: reqwest::Client,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn new(opts: Options) -> Self {
        // Redirects are disabled: following one off the validated host
        // would bypass the whitelist, so a 3xx surfaces as an HTTP error.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(&opts.user_agent)
            .timeout(opts.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .expect("failed to build HTTP client");

        Self { opts, http }
    }

    /// Validate, fetch, and parse a candidate URL. Exactly one network
    /// round trip on the success path; no retries at this layer.
    pub async fn fetch_and_parse(&self, raw_url: &str) -> Result<ParsedScenario, FetchError> {
        let validated = validate(raw_url)?;
        match validated.source() {
            SourceKind::Booth => self.fetch_booth(&validated).await,
            SourceKind::Talto => self.fetch_talto(&validated).await,
        }
    }

    async fn fetch_booth(&self, validated: &ValidatedUrl) -> Result<ParsedScenario, FetchError> {
        let target = match &self.opts.booth_base {
            Some(base) => base
                .join(validated.url().path())
                .map_err(|_| FetchError::BadIdentifier)?,
            None => validated.url().clone(),
        };

        let response = self
            .http
            .get(target)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(map_transport)?;

        let body = bounded_body(response).await?;
        Ok(booth::parse(&body, validated.as_str())?)
    }

    async fn fetch_talto(&self, validated: &ValidatedUrl) -> Result<ParsedScenario, FetchError> {
        let id = talto_project_id(validated.url().path()).ok_or(FetchError::BadIdentifier)?;
        let endpoint = self
            .opts
            .talto_api_base
            .join(id)
            .map_err(|_| FetchError::BadIdentifier)?;

        let response = self
            .http
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport)?;

        let body = bounded_body(response).await?;
        Ok(talto::parse(&body, validated.as_str())?)
    }
}

/// Opaque project identifier from an API-source URL path.
fn talto_project_id(path: &str) -> Option<&str> {
    TALTO_PROJECT_PATH_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Enforce status and the declared-size cap, then read the body as text.
async fn bounded_body(response: reqwest::Response) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    if let Some(len) = declared_content_length(&response) {
        if len > MAX_CONTENT_LENGTH {
            return Err(FetchError::TooLarge(len));
        }
    }

    response.text().await.map_err(map_transport)
}

/// Declared content length, falling back to a manual header parse when the
/// decompression layer hides `content_length()`.
fn declared_content_length(response: &reqwest::Response) -> Option<u64> {
    response.content_length().or_else(|| {
        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    })
}

fn map_transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, ValidationError};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    fn mock_url(server: &MockServer) -> Url {
        Url::parse(&server.base_url()).unwrap()
    }

    #[test]
    fn test_talto_project_id() {
        assert_eq!(talto_project_id("/projects/abc123"), Some("abc123"));
        assert_eq!(talto_project_id("/projects/a-b_c/"), Some("a-b_c"));
        assert_eq!(talto_project_id("/projects/"), None);
        assert_eq!(talto_project_id("/about"), None);
        assert_eq!(talto_project_id("/projects/abc/extra"), None);
    }

    #[tokio::test]
    async fn test_talto_fetch_hits_api_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/abc123")
                .header("accept", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"title":"T","min_players":3,"max_players":4}"#);
        });

        let client = Client::builder()
            .talto_api_base(mock_url(&server))
            .build();
        let scenario = client
            .fetch_and_parse("https://talto.cc/projects/abc123")
            .await
            .unwrap();
        mock.assert();

        assert_eq!(scenario.title.as_ref().unwrap().value, "T");
        assert_eq!(scenario.player_range(), Some((3, 4)));
        assert_eq!(scenario.source_url, "https://talto.cc/projects/abc123");
    }

    #[tokio::test]
    async fn test_talto_bad_identifier_makes_no_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let client = Client::builder()
            .talto_api_base(mock_url(&server))
            .build();
        let err = client
            .fetch_and_parse("https://talto.cc/profile/someone")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::BadIdentifier));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_booth_fetch_parses_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ja/items/12345");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(
                    r#"<html><head><script type="application/ld+json">
{"@type":"Product","name":"Scenario","brand":{"name":"Circle"}}
</script></head><body></body></html>"#,
                );
        });

        let client = Client::builder().booth_base(mock_url(&server)).build();
        let scenario = client
            .fetch_and_parse("https://booth.pm/ja/items/12345")
            .await
            .unwrap();
        mock.assert();

        assert_eq!(scenario.title.unwrap().value, "Scenario");
        assert_eq!(scenario.author.unwrap().value, "Circle");
        assert_eq!(scenario.source_url, "https://booth.pm/ja/items/12345");
    }

    #[tokio::test]
    async fn test_non_2xx_status_surfaces_as_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ja/items/404");
            then.status(404).body("not found");
        });

        let client = Client::builder().booth_base(mock_url(&server)).build();
        let err = client
            .fetch_and_parse("https://booth.pm/ja/items/404")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http(404)));
    }

    #[tokio::test]
    async fn test_malformed_api_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/abc");
            then.status(200).body("<!DOCTYPE html>not json");
        });

        let client = Client::builder()
            .talto_api_base(mock_url(&server))
            .build();
        let err = client
            .fetch_and_parse("https://talto.cc/projects/abc")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn test_validation_failure_before_any_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let client = Client::builder()
            .booth_base(mock_url(&server))
            .talto_api_base(mock_url(&server))
            .build();
        let err = client
            .fetch_and_parse("https://example.com/page")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Invalid(ValidationError::UnsupportedDomain)
        ));
        assert_eq!(mock.hits(), 0);
    }
}
