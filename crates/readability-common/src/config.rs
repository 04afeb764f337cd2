use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Default endpoint for the xAuth login handshake.
pub const DEFAULT_LOGIN_URL: &str = "https://www.readability.com/api/rest/v1/oauth/access_token/";
/// Default base URL of the Reader API.
pub const DEFAULT_READER_BASE_URL: &str = "https://www.readability.com/api/rest/v1/";
/// Default base URL of the Parser API.
pub const DEFAULT_PARSER_BASE_URL: &str = "https://www.readability.com/api/content/v1/";

/// An OAuth credential pair: a public identifier and its shared secret.
///
/// The same shape identifies the application (consumer key and secret) and an
/// individual user (token and token secret obtained from the login handshake).
/// The secret is held in a [`SecretString`] and never printed by `Debug`.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Public identifier (consumer key or access token).
    pub key: String,
    /// Shared secret (consumer secret or token secret).
    pub secret: SecretString,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::new(secret.into().into()),
        }
    }

    /// Returns the public identifier.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the secret.
    ///
    /// Callers are responsible for not logging the returned value.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.secret() == other.secret()
    }
}

impl Eq for Credentials {}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

fn default_reader_base_url() -> String {
    DEFAULT_READER_BASE_URL.to_string()
}

fn default_parser_base_url() -> String {
    DEFAULT_PARSER_BASE_URL.to_string()
}

/// Configuration shared by every client derived from one facade.
///
/// Created once by the embedding application and never mutated afterwards; Reader and
/// Parser clients hold a shared read-only handle to it.
///
/// # Examples
///
/// ```
/// use readability_common::Config;
///
/// let config = Config::new("key", "secret")
///     .with_parser_api_key("parser-token")
///     .with_reader_base_url("http://localhost:8080");
///
/// assert_eq!(config.reader_base_url, "http://localhost:8080");
/// assert_eq!(config.consumer.key(), "key");
/// ```
///
/// The configuration can also be deserialized; URLs fall back to the public endpoints:
///
/// ```
/// use readability_common::{Config, DEFAULT_READER_BASE_URL};
///
/// let config: Config = serde_json::from_str(
///     r#"{"consumer": {"key": "k", "secret": "s"}, "parser_api_key": "t"}"#,
/// )?;
/// assert_eq!(config.reader_base_url, DEFAULT_READER_BASE_URL);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Endpoint that exchanges a username and password for a user token.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Base URL of the Reader API.
    #[serde(default = "default_reader_base_url")]
    pub reader_base_url: String,
    /// Base URL of the Parser API.
    #[serde(default = "default_parser_base_url")]
    pub parser_base_url: String,
    /// Consumer credentials identifying the application.
    pub consumer: Credentials,
    /// API key for the Parser API, sent as the `token` query parameter.
    #[serde(default)]
    pub parser_api_key: Option<SecretString>,
}

impl Config {
    /// Creates a configuration for the public endpoints with the given consumer pair.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            login_url: default_login_url(),
            reader_base_url: default_reader_base_url(),
            parser_base_url: default_parser_base_url(),
            consumer: Credentials::new(consumer_key, consumer_secret),
            parser_api_key: None,
        }
    }

    /// Sets the Parser API key.
    #[must_use]
    pub fn with_parser_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.parser_api_key = Some(SecretString::new(api_key.into().into()));
        self
    }

    /// Overrides the login endpoint.
    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    /// Overrides the Reader API base URL.
    #[must_use]
    pub fn with_reader_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.reader_base_url = base_url.into();
        self
    }

    /// Overrides the Parser API base URL.
    #[must_use]
    pub fn with_parser_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.parser_base_url = base_url.into();
        self
    }

    /// Points every endpoint at one server.
    ///
    /// Mostly useful for tests against a local mock server.
    #[must_use]
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.with_login_url(base_url.clone())
            .with_reader_base_url(base_url.clone())
            .with_parser_base_url(base_url)
    }
}

// Custom Debug implementation to avoid exposing secrets
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("login_url", &self.login_url)
            .field("reader_base_url", &self.reader_base_url)
            .field("parser_base_url", &self.parser_base_url)
            .field("consumer", &self.consumer)
            .field(
                "parser_api_key",
                &self.parser_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
