//! The facade: shared configuration, login, and construction of API clients.

use std::fmt;
use std::sync::Arc;

use log::debug;
use secrecy::SecretString;
use url::Url;

use readability_common::{Config, Credentials};

use crate::error::{ClientError, Result};
use crate::oauth;
use crate::params::Params;
use crate::parser::ParserClient;
use crate::reader::ReaderClient;
use crate::response::{ApiResponse, RawResponse};
use crate::transport::Transport;

/// State shared read-only by the facade and every client derived from it.
pub(crate) struct Shared {
    pub(crate) config: Config,
    pub(crate) login_url: Url,
    pub(crate) reader_base_url: Url,
    pub(crate) parser_base_url: Url,
    pub(crate) transport: Transport,
}

/// Appends path segments to a base URL, ignoring a trailing slash on the base.
///
/// Segments are percent-encoded individually, so a `/` inside one stays inside it.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Bases are checked to be hierarchical when the facade is built
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn parse_base_url(name: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)?;
    if url.cannot_be_a_base() {
        return Err(ClientError::Configuration(format!(
            "{name} cannot be used as a base URL: {value}"
        )));
    }
    Ok(url)
}

/// Entry point for both Readability APIs.
///
/// Holds the configuration and the HTTP connection pool, performs the login
/// handshake, and hands out [`ReaderClient`]s and [`ParserClient`]s that share both.
///
/// # Examples
///
/// ```no_run
/// use readability_client::Client;
/// use readability_common::Config;
///
/// # async fn example() -> Result<(), readability_client::ClientError> {
/// let client = Client::new(
///     Config::new("consumer-key", "consumer-secret").with_parser_api_key("parser-token"),
/// )?;
///
/// let article = client
///     .new_parser_client()?
///     .parse("http://www.example.com/story")
///     .await?
///     .into_data();
/// println!("{}", article.title);
///
/// let token = client.login("username", "password").await?.into_data();
/// let reader = client.new_reader_client(token.key(), token.secret());
/// let response = reader.add_bookmark("http://www.example.com/story").await?;
/// println!("bookmark created at {:?}", response.location());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL is invalid or the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http_client(config, http)
    }

    /// Creates a client that dispatches through `http`.
    ///
    /// Use this to set timeouts, proxies or TLS options; the library adds none itself.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL is invalid.
    pub fn with_http_client(config: Config, http: reqwest::Client) -> Result<Self> {
        let login_url = Url::parse(&config.login_url)?;
        let reader_base_url = parse_base_url("reader_base_url", &config.reader_base_url)?;
        let parser_base_url = parse_base_url("parser_base_url", &config.parser_base_url)?;

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                login_url,
                reader_base_url,
                parser_base_url,
                transport: Transport::new(http),
            }),
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Exchanges a username and password for a user token pair (xAuth).
    ///
    /// The request is signed with the consumer pair only. The service answers with a
    /// form-encoded body, not JSON, holding `oauth_token` and `oauth_token_secret`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRequest`] if `username` is empty
    /// - [`ClientError::Http`] if the service answers with a status of 400 or above
    /// - [`ClientError::FormParse`] if the body is not form-encoded or lacks either field
    /// - [`ClientError::Network`] if the request could not be completed
    pub async fn login(&self, username: &str, password: &str) -> Result<ApiResponse<Credentials>> {
        if username.is_empty() {
            return Err(ClientError::InvalidRequest(
                "username must not be empty".to_string(),
            ));
        }

        let form = Params::new()
            .with("x_auth_username", username)
            .with("x_auth_password", password)
            .with("x_auth_mode", "client_auth");
        let url = self.shared.login_url.clone();
        let form = oauth::sign_for_post(&self.shared.config.consumer, None, &url, form);

        let response = self.shared.transport.post(url, &form).await?;
        let token = parse_token_response(response)?;
        debug!("Logged in as {username}");
        Ok(token)
    }

    /// Binds a user token pair to this client's configuration.
    ///
    /// No network I/O happens here.
    pub fn new_reader_client(
        &self,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> ReaderClient {
        ReaderClient::new(Arc::clone(&self.shared), Credentials::new(token, secret))
    }

    /// Binds the configured Parser API key and base URL.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if no Parser API key is configured.
    pub fn new_parser_client(&self) -> Result<ParserClient> {
        let api_key: SecretString = self
            .shared
            .config
            .parser_api_key
            .clone()
            .ok_or_else(|| ClientError::Configuration("Parser API key is required".to_string()))?;
        Ok(ParserClient::new(Arc::clone(&self.shared), api_key))
    }
}

/// Extracts `oauth_token` and `oauth_token_secret` from a form-encoded login body.
fn parse_token_response(response: RawResponse) -> Result<ApiResponse<Credentials>> {
    let Ok(body) = response.text() else {
        return Err(ClientError::form_parse("body is not valid UTF-8", response));
    };
    let body = body.trim();
    if let Err(reason) = validate_form_encoding(body) {
        return Err(ClientError::form_parse(reason, response));
    }

    let mut token = None;
    let mut secret = None;
    for (name, value) in url::form_urlencoded::parse(body.as_bytes()) {
        match name.as_ref() {
            "oauth_token" if token.is_none() => token = Some(value.into_owned()),
            "oauth_token_secret" if secret.is_none() => secret = Some(value.into_owned()),
            _ => {}
        }
    }

    match (token, secret) {
        (Some(token), Some(secret)) if !token.is_empty() && !secret.is_empty() => {
            let credentials = Credentials {
                key: token,
                secret: SecretString::new(secret.into()),
            };
            Ok(ApiResponse::new(credentials, response))
        }
        (token, _) => {
            let missing = if token.is_none_or(|t| t.is_empty()) {
                "oauth_token"
            } else {
                "oauth_token_secret"
            };
            Err(ClientError::form_parse(
                format!("missing {missing} in login response"),
                response,
            ))
        }
    }
}

/// Rejects malformed percent escapes.
///
/// Every `%` must start a two hex digit escape. `form_urlencoded::parse` and
/// `urlencoding::decode` keep a malformed escape as literal text, which would turn a
/// garbled body into a wrong token instead of an error.
fn validate_form_encoding(body: &str) -> std::result::Result<(), String> {
    let malformed = body.split('%').skip(1).position(|rest| {
        !rest
            .as_bytes()
            .get(..2)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    match malformed {
        Some(index) => Err(format!("invalid percent escape (escape #{})", index + 1)),
        None => Ok(()),
    }
}
