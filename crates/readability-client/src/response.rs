//! Captured HTTP responses.

use reqwest::header::{AsHeaderName, HeaderMap, LOCATION};
use reqwest::{Method, StatusCode};
use url::Url;

/// A fully read HTTP response together with the request line that produced it.
///
/// The body is read eagerly so the response can be handed back to callers, attached to
/// errors, and decoded more than once.
#[derive(Debug, Clone)]
pub struct RawResponse {
    method: Method,
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RawResponse {
    pub(crate) fn new(
        method: Method,
        url: Url,
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method,
            url,
            status,
            headers,
            body,
        }
    }

    /// Reads the whole body of `response`.
    pub(crate) async fn read(method: Method, response: reqwest::Response) -> reqwest::Result<Self> {
        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self::new(method, url, status, headers, body))
    }

    /// Method the request was issued with.
    ///
    /// When the HTTP client follows a 301, 302 or 303 redirect of a POST it re-issues
    /// the request as a GET; this still reports POST, while [`url`](Self::url) is the
    /// redirect target.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Final URL of the request, after redirects.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value if it is present and valid visible ASCII.
    #[must_use]
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The `Location` header, set by the Reader API when a bookmark is created.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION)
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

/// A decoded response value along with the response it was decoded from.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// The decoded value.
    pub data: T,
    /// The response the value came from.
    pub raw: RawResponse,
}

impl<T> ApiResponse<T> {
    pub(crate) fn new(data: T, raw: RawResponse) -> Self {
        Self { data, raw }
    }

    /// Discards the response and returns the decoded value.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Splits into the decoded value and the response.
    pub fn into_parts(self) -> (T, RawResponse) {
        (self.data, self.raw)
    }

    /// Maps the decoded value, keeping the response.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse::new(f(self.data), self.raw)
    }
}
