//! # readability-client
//!
//! Client library for the Readability APIs.
//!
//! Two APIs are covered:
//! - The Reader API, OAuth1-signed, for a user's bookmarks and saved articles
//! - The Parser API, authenticated with an API key, for turning any URL into a
//!   cleaned article
//!
//! A [`Client`] holds the shared configuration, performs the xAuth login handshake,
//! and hands out [`ReaderClient`]s and [`ParserClient`]s. Every operation is a single
//! HTTP round trip; there are no retries and no caching.
//!
//! ## Example
//!
//! ```no_run
//! use readability_client::Client;
//! use readability_common::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::new("consumer-key", "consumer-secret")
//!     .with_parser_api_key("parser-token");
//! let client = Client::new(config)?;
//!
//! let parser = client.new_parser_client()?;
//! let score = parser.confidence("http://www.example.com/story").await?.into_data();
//! if score > 0.5 {
//!     let article = parser.parse("http://www.example.com/story").await?.into_data();
//!     println!("{} ({} words)", article.title, article.word_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Failures are reported as [`ClientError`]:
//! - [`ClientError::Http`] for any status of 400 or above
//! - [`ClientError::Decode`] when a JSON body does not fit the expected record
//! - [`ClientError::FormParse`] when the login response cannot be read
//! - [`ClientError::Network`] for failures below HTTP
//!
//! Errors raised after a response arrived carry that response, see
//! [`ClientError::response`].

pub mod client;
pub mod error;
pub mod oauth;
pub mod params;
pub mod parser;
pub mod reader;
pub mod response;
pub mod transport;

pub use client::Client;
pub use error::{ClientError, Result};
pub use params::Params;
pub use parser::ParserClient;
pub use reader::ReaderClient;
pub use response::{ApiResponse, RawResponse};
pub use transport::Transport;

pub use readability_common::{Article, Confidence, Config, Credentials, LooseValue};
