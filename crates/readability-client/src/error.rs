//! Error types for the client library.

use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

use crate::response::RawResponse;
use crate::transport::redacted;

/// Errors that can occur when talking to the Readability APIs.
///
/// Every variant produced after a response arrived carries the captured
/// [`RawResponse`], so callers can still inspect headers and body of a failed call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The server answered with a status of 400 or above.
    ///
    /// Never retried; the body is kept in `response` whatever its content. The
    /// message leaves out the query string, which may hold the API key or signature.
    #[error("{status}. {method} {}.", redacted(.url))]
    Http {
        /// Response status code.
        status: StatusCode,
        /// Method the failed request was issued with, see [`RawResponse::method`].
        method: Method,
        /// URL of the failed request, after redirects.
        url: Url,
        /// The full response.
        response: Box<RawResponse>,
    },

    /// The response body does not fit the expected JSON shape.
    #[error("failed to decode response body: {source}")]
    Decode {
        /// The underlying JSON error.
        source: serde_json::Error,
        /// The response whose body failed to decode.
        response: Box<RawResponse>,
    },

    /// The login response is not valid form-encoded data or lacks the token fields.
    #[error("failed to parse form response: {reason}")]
    FormParse {
        /// What was wrong with the body.
        reason: String,
        /// The response whose body failed to parse.
        response: Box<RawResponse>,
    },

    /// Network or HTTP transport failure.
    ///
    /// Covers DNS resolution, refused connections, timeouts configured on the
    /// underlying HTTP client, and failures while reading the body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A configured URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client configuration issue, such as a missing Parser API key.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed call, such as an empty article URL.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub(crate) fn http(response: RawResponse) -> Self {
        Self::Http {
            status: response.status(),
            method: response.method().clone(),
            url: response.url().clone(),
            response: Box::new(response),
        }
    }

    pub(crate) fn decode(source: serde_json::Error, response: RawResponse) -> Self {
        Self::Decode {
            source,
            response: Box::new(response),
        }
    }

    pub(crate) fn form_parse(reason: impl Into<String>, response: RawResponse) -> Self {
        Self::FormParse {
            reason: reason.into(),
            response: Box::new(response),
        }
    }

    /// Returns the HTTP status if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(RawResponse::status)
    }

    /// Returns the canonical reason phrase of an HTTP error, e.g. `"Not Found"`.
    #[must_use]
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            Self::Http { status, .. } => status.canonical_reason(),
            _ => None,
        }
    }

    /// Returns the response that caused this error, if one was received.
    #[must_use]
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Self::Http { response, .. }
            | Self::Decode { response, .. }
            | Self::FormParse { response, .. } => Some(&**response),
            _ => None,
        }
    }

    /// Check if the server answered with a status of 400 or above.
    #[must_use]
    pub const fn is_http_error(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Check if a JSON body failed to decode.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if a form-encoded body failed to parse.
    #[must_use]
    pub const fn is_form_parse_error(&self) -> bool {
        matches!(self, Self::FormParse { .. })
    }

    /// Check if the request failed below the HTTP layer.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use reqwest::header::HeaderMap;

    use super::*;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse::new(
            Method::GET,
            Url::parse("http://www.example.com/parser").unwrap(),
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_http_error_display() {
        let error = ClientError::http(response(404, "missing"));
        assert_eq!(
            error.to_string(),
            "404 Not Found. GET http://www.example.com/parser."
        );
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(error.status_text(), Some("Not Found"));
        assert!(error.is_http_error());
        assert!(!error.is_decode_error());
    }

    #[test]
    fn test_http_error_display_hides_query() {
        let raw = RawResponse::new(
            Method::GET,
            Url::parse("http://www.example.com/parser?url=a&token=SUPER-SECRET-KEY").unwrap(),
            StatusCode::FORBIDDEN,
            HeaderMap::new(),
            Vec::new(),
        );
        let error = ClientError::http(raw);

        assert_eq!(
            error.to_string(),
            "403 Forbidden. GET http://www.example.com/parser."
        );
        match &error {
            ClientError::Http { url, .. } => {
                assert_eq!(url.query(), Some("url=a&token=SUPER-SECRET-KEY"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_decode_error_keeps_response() {
        let source = serde_json::from_str::<serde_json::Value>("foo").unwrap_err();
        let error = ClientError::decode(source, response(200, "foo"));

        assert!(error.is_decode_error());
        assert!(!error.is_http_error());
        assert_eq!(error.status(), Some(StatusCode::OK));
        assert_eq!(error.response().unwrap().text().unwrap(), "foo");
        assert_eq!(error.status_text(), None);
    }

    #[test]
    fn test_errors_without_response() {
        let error = ClientError::InvalidRequest("empty".to_string());
        assert!(error.response().is_none());
        assert!(error.status().is_none());
        assert!(!error.is_network_error());
    }
}
