//! HTTP dispatch shared by the Parser and Reader clients.
//!
//! One call is one round trip: no retries, no caching. Any status of 400 or above
//! becomes [`ClientError::Http`]; JSON decoding is a separate step so that endpoints
//! answering without a body (such as bookmark creation) still succeed.

use log::{debug, warn};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ClientError, Result};
use crate::params::Params;
use crate::response::{ApiResponse, RawResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Thin wrapper around a `reqwest::Client`.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    /// Wraps an existing HTTP client.
    ///
    /// Timeouts, proxies and TLS settings are taken from `http` as-is.
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issues a GET with `query` appended to `url` as a URL-encoded query string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] for a status of 400 or above and
    /// [`ClientError::Network`] if the request could not be completed.
    pub async fn get(&self, mut url: Url, query: &Params) -> Result<RawResponse> {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        debug!("GET {}", redacted(&url));

        let response = self.http.get(url).send().await?;
        Self::check(RawResponse::read(Method::GET, response).await?)
    }

    /// Issues a POST with `form` as an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] for a status of 400 or above and
    /// [`ClientError::Network`] if the request could not be completed.
    pub async fn post(&self, url: Url, form: &Params) -> Result<RawResponse> {
        debug!("POST {}", redacted(&url));

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .body(form.encode())
            .send()
            .await?;
        Self::check(RawResponse::read(Method::POST, response).await?)
    }

    /// Decodes the body of `response` as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`], carrying the response, if the body is not
    /// valid JSON or does not match `T`.
    pub fn decode_json<T: DeserializeOwned>(response: RawResponse) -> Result<ApiResponse<T>> {
        match serde_json::from_slice(response.body()) {
            Ok(data) => Ok(ApiResponse::new(data, response)),
            Err(e) => {
                debug!(
                    "Failed to decode response from {}: {e}",
                    redacted(response.url())
                );
                Err(ClientError::decode(e, response))
            }
        }
    }

    fn check(response: RawResponse) -> Result<RawResponse> {
        if response.status().as_u16() >= 400 {
            warn!(
                "{} {} failed with status {}",
                response.method(),
                redacted(response.url()),
                response.status()
            );
            return Err(ClientError::http(response));
        }
        Ok(response)
    }
}

/// Drops the query so API keys and OAuth signatures never reach the logs.
pub(crate) fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
