// ABOUTME: Library entry point for the scenario metadata extraction pipeline.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ParsedScenario, and the error types.

//! Scandex extract - metadata extraction for user-submitted scenario URLs.
//!
//! Takes a URL pointing at one of two curated scenario listing sources,
//! validates it is safe to fetch, retrieves the content within hard bounds,
//! and extracts title, author, player-count, and playtime fields, each
//! tagged with a confidence rating. No markup, control characters, or
//! SSRF-targeted hosts ever leave the pipeline.
//!
//! # Example
//!
//! ```no_run
//! use scandex_extract::{Client, FetchError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FetchError> {
//!     let client = Client::builder().build();
//!     let scenario = client
//!         .fetch_and_parse("https://booth.pm/ja/items/12345")
//!         .await?;
//!     println!("{:?}", scenario.title);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod patterns;
pub mod sanitize;
pub mod scenario;
pub mod sources;
pub mod validator;

pub use crate::client::{Client, ClientBuilder, Options, FETCH_TIMEOUT, MAX_CONTENT_LENGTH};
pub use crate::error::{FetchError, ParseError, ValidationError};
pub use crate::sanitize::{sanitize_positive_int, sanitize_text};
pub use crate::scenario::{Confidence, ParsedField, ParsedScenario, SourceKind};
pub use crate::validator::{validate, ValidatedUrl};
