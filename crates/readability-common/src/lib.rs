//! # readability-common
//!
//! Common types shared by the Readability Reader and Parser API clients.
//!
//! This crate provides:
//! - The `Article` record returned by both APIs, tolerant of loosely typed fields
//! - The `Confidence` record returned by the Parser API
//! - OAuth credential pairs and the shared client configuration
//!
//! ## Example
//!
//! ```
//! use readability_common::{Article, Config};
//!
//! let config = Config::new("consumer-key", "consumer-secret")
//!     .with_parser_api_key("parser-token");
//! assert!(config.parser_api_key.is_some());
//!
//! let article: Article = serde_json::from_str(r#"{"author": "Steve Jobs", "word_count": 120}"#)?;
//! assert_eq!(article.author.as_ref().and_then(|a| a.as_str()), Some("Steve Jobs"));
//! assert_eq!(article.word_count, 120);
//! # Ok::<(), serde_json::Error>(())
//! ```

/// Article and confidence records returned by the APIs.
pub mod article;
/// Credentials and client configuration.
pub mod config;

pub use article::{Article, Confidence, LooseValue};
pub use config::{
    Config, Credentials, DEFAULT_LOGIN_URL, DEFAULT_PARSER_BASE_URL, DEFAULT_READER_BASE_URL,
};
