//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Signing is a pure function of the credentials, the request method, the request URL
//! and its parameters. Nothing is stored between calls: callers pass the consumer pair
//! and, once logged in, the user token pair on every call.
//!
//! # Examples
//!
//! ```
//! use readability_client::oauth;
//! use readability_client::Params;
//! use readability_common::Credentials;
//! use url::Url;
//!
//! let consumer = Credentials::new("consumer-key", "consumer-secret");
//! let url = Url::parse("https://www.readability.com/api/rest/v1/bookmarks")?;
//! let form = Params::new().with("url", "http://www.example.com/");
//!
//! let signed = oauth::sign_for_post(&consumer, None, &url, form);
//! assert_eq!(signed.get("oauth_consumer_key"), Some("consumer-key"));
//! assert!(signed.contains("oauth_signature"));
//! assert!(!signed.contains("oauth_token"));
//! # Ok::<(), url::ParseError>(())
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Method;
use sha1::Sha1;
use url::Url;

use readability_common::Credentials;

use crate::params::Params;

/// The only signature method this client produces.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// Value of `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

type HmacSha1 = Hmac<Sha1>;

/// Signs a query string for a GET request.
///
/// Returns `params` with the `oauth_*` fields and `oauth_signature` appended.
#[must_use]
pub fn sign_for_get(
    consumer: &Credentials,
    token: Option<&Credentials>,
    url: &Url,
    params: Params,
) -> Params {
    sign(&Method::GET, consumer, token, url, params)
}

/// Signs a form body for a POST request.
///
/// Returns `params` with the `oauth_*` fields and `oauth_signature` appended.
#[must_use]
pub fn sign_for_post(
    consumer: &Credentials,
    token: Option<&Credentials>,
    url: &Url,
    params: Params,
) -> Params {
    sign(&Method::POST, consumer, token, url, params)
}

/// Signs `params` with the current time and a fresh random nonce.
#[must_use]
pub fn sign(
    method: &Method,
    consumer: &Credentials,
    token: Option<&Credentials>,
    url: &Url,
    params: Params,
) -> Params {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    sign_with(
        method,
        consumer,
        token,
        url,
        params,
        Utc::now().timestamp(),
        &nonce,
    )
}

/// Signs `params` with a caller-chosen timestamp and nonce.
///
/// Deterministic, which makes it suitable for checking against known vectors.
#[must_use]
pub fn sign_with(
    method: &Method,
    consumer: &Credentials,
    token: Option<&Credentials>,
    url: &Url,
    mut params: Params,
    timestamp: i64,
    nonce: &str,
) -> Params {
    params.append("oauth_consumer_key", consumer.key());
    params.append("oauth_nonce", nonce);
    params.append("oauth_signature_method", SIGNATURE_METHOD);
    params.append("oauth_timestamp", timestamp.to_string());
    if let Some(token) = token {
        params.append("oauth_token", token.key());
    }
    params.append("oauth_version", OAUTH_VERSION);

    let signature = signature(method, consumer, token, url, &params);
    params.append("oauth_signature", signature);
    params
}

/// Computes the base64 HMAC-SHA1 signature over the signature base string.
///
/// `params` must already contain the `oauth_*` protocol fields and must not contain
/// `oauth_signature`.
#[must_use]
pub fn signature(
    method: &Method,
    consumer: &Credentials,
    token: Option<&Credentials>,
    url: &Url,
    params: &Params,
) -> String {
    let key = signing_key(consumer, token);
    let base = signature_base_string(method, url, params);

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(base.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Builds the HMAC key: the encoded consumer secret, `&`, and the encoded token secret.
///
/// The separator is present even without a token.
#[must_use]
pub fn signing_key(consumer: &Credentials, token: Option<&Credentials>) -> String {
    let token_secret = token.map(Credentials::secret).unwrap_or_default();
    format!(
        "{}&{}",
        percent_encode(consumer.secret()),
        percent_encode(token_secret)
    )
}

/// Builds `METHOD&encoded base URL&encoded normalized parameters`.
///
/// Query pairs already present on `url` take part in the normalized parameters.
#[must_use]
pub fn signature_base_string(method: &Method, url: &Url, params: &Params) -> String {
    format!(
        "{}&{}&{}",
        method.as_str().to_ascii_uppercase(),
        percent_encode(&base_url(url)),
        percent_encode(&normalized_parameters(url, params))
    )
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
#[must_use]
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Scheme, host, non-default port and path; no query or fragment.
fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    // `Url` already drops default ports and lower-cases scheme and host
    match url.port() {
        Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
        None => format!("{}://{host}{}", url.scheme(), url.path()),
    }
}

fn normalized_parameters(url: &Url, params: &Params) -> String {
    let mut encoded: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| (percent_encode(&name), percent_encode(&value)))
        .chain(
            params
                .iter()
                .map(|(name, value)| (percent_encode(name), percent_encode(value))),
        )
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn percent_encoding_uses_unreserved_set_only(value in ".*") {
            let encoded = percent_encode(&value);
            let unreserved = encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '%'));
            prop_assert!(unreserved, "unexpected character in {}", encoded);
        }

        #[test]
        fn signing_is_deterministic(
            key in "[a-z]{1,8}",
            secret in ".*",
            name in "[a-z_]{1,8}",
            value in ".*",
            timestamp in 0i64..4_000_000_000,
        ) {
            let consumer = Credentials::new(key, secret);
            let url = Url::parse("http://www.example.com/bookmarks").unwrap_or_else(|_| unreachable!());
            let params = Params::new().with(name, value);

            let first = sign_with(&Method::POST, &consumer, None, &url, params.clone(), timestamp, "n");
            let second = sign_with(&Method::POST, &consumer, None, &url, params, timestamp, "n");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn parameter_order_does_not_matter(a in ".*", b in ".*") {
            let consumer = Credentials::new("ck", "cs");
            let url = Url::parse("http://www.example.com/bookmarks").unwrap_or_else(|_| unreachable!());
            let forward = Params::new().with("a", a.clone()).with("b", b.clone());
            let backward = Params::new().with("b", b).with("a", a);

            let first = sign_with(&Method::GET, &consumer, None, &url, forward, 1, "n");
            let second = sign_with(&Method::GET, &consumer, None, &url, backward, 1, "n");
            prop_assert_eq!(first.get("oauth_signature"), second.get("oauth_signature"));
        }
    }
}
