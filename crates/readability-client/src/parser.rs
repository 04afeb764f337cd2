//! Parser API client.
//!
//! The Parser API turns any article URL into cleaned content. Requests are plain GETs
//! authenticated with an API key passed as the `token` query parameter; they are not
//! OAuth-signed.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use readability_common::{Article, Confidence};

use crate::client::{Shared, endpoint};
use crate::error::{ClientError, Result};
use crate::params::Params;
use crate::response::{ApiResponse, RawResponse};
use crate::transport::Transport;

/// Client for the Parser API.
///
/// Created with [`Client::new_parser_client`](crate::Client::new_parser_client).
/// Cheap to clone; clones share configuration and connection pool.
#[derive(Clone)]
pub struct ParserClient {
    shared: Arc<Shared>,
    api_key: SecretString,
}

// Custom Debug implementation to avoid exposing the API key
impl fmt::Debug for ParserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserClient")
            .field("base_url", &self.shared.parser_base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ParserClient {
    pub(crate) const fn new(shared: Arc<Shared>, api_key: SecretString) -> Self {
        Self { shared, api_key }
    }

    /// Parses the article at `article_url`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRequest`] if `article_url` is empty
    /// - [`ClientError::Http`] if the service answers with a status of 400 or above
    /// - [`ClientError::Decode`] if the body is not an article
    /// - [`ClientError::Network`] if the request could not be completed
    pub async fn parse(&self, article_url: &str) -> Result<ApiResponse<Article>> {
        let response = self.get("parser", article_url).await?;
        Transport::decode_json(response)
    }

    /// Returns how confident the service is that it can parse `article_url`.
    ///
    /// Only the score is returned; the echoed URL is dropped.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse). A body that is not a confidence record, such as
    /// plain text, is a [`ClientError::Decode`], never a zero score.
    pub async fn confidence(&self, article_url: &str) -> Result<ApiResponse<f64>> {
        let response = self.get("confidence", article_url).await?;
        Ok(Transport::decode_json::<Confidence>(response)?.map(|c| c.confidence))
    }

    async fn get(&self, name: &str, article_url: &str) -> Result<RawResponse> {
        if article_url.is_empty() {
            return Err(ClientError::InvalidRequest(
                "article URL must not be empty".to_string(),
            ));
        }

        let url = endpoint(&self.shared.parser_base_url, &[name]);
        let query = Params::new()
            .with("url", article_url)
            .with("token", self.api_key.expose_secret());
        self.shared.transport.get(url, &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use readability_common::{Config, LooseValue};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::Client;

    const ARTICLE_URL: &str = "http://www.example.com/";

    fn create_parser(base_url: &str) -> ParserClient {
        let config = Config::new("key", "secret")
            .with_parser_api_key("token")
            .with_base_url(base_url);
        Client::new(config).unwrap().new_parser_client().unwrap()
    }

    #[tokio::test]
    async fn test_parse() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/parser"))
            .and(query_param("url", ARTICLE_URL))
            .and(query_param("token", "token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "author": "Steve Jobs",
                "short_url": "http://rdd.me/4ksnrhhl"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let article = parser.parse(ARTICLE_URL).await.unwrap().into_data();

        assert_eq!(article.author, Some(LooseValue::from("Steve Jobs")));
        assert_eq!(article.short_url, "http://rdd.me/4ksnrhhl");
        assert_eq!(article.title, "");
    }

    #[tokio::test]
    async fn test_parse_sends_exactly_url_and_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/parser"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        parser
            .parse("http://www.example.com/a?b=c&d=e")
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method.as_str(), "GET");

        let mut query: Vec<(String, String)> = requests[0].url.query_pairs().into_owned().collect();
        query.sort();
        assert_eq!(
            query,
            vec![
                ("token".to_string(), "token".to_string()),
                (
                    "url".to_string(),
                    "http://www.example.com/a?b=c&d=e".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_parse_is_repeatable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/parser"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Same",
                "word_count": 3,
                "next_page_id": 2
            })))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let first = parser.parse(ARTICLE_URL).await.unwrap().into_data();
        let second = parser.parse(ARTICLE_URL).await.unwrap().into_data();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_parse_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/parser"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "author": "ignored"
            })))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let error = parser.parse(ARTICLE_URL).await.unwrap_err();

        assert!(error.is_http_error());
        assert_eq!(error.status().unwrap().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_http_error_message_hides_api_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/parser"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let config = Config::new("key", "secret")
            .with_parser_api_key("SUPER-SECRET-KEY")
            .with_base_url(mock_server.uri());
        let parser = Client::new(config).unwrap().new_parser_client().unwrap();
        let error = parser.parse(ARTICLE_URL).await.unwrap_err();

        assert!(error.is_http_error());
        let message = error.to_string();
        assert!(message.starts_with("403 Forbidden. GET "));
        assert!(!message.contains("SUPER-SECRET-KEY"));
        assert!(!message.contains("token="));
    }

    #[tokio::test]
    async fn test_parse_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/parser"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let error = parser.parse(ARTICLE_URL).await.unwrap_err();

        assert!(error.is_decode_error());
    }

    #[tokio::test]
    async fn test_parse_rejects_empty_url() {
        let parser = create_parser("http://127.0.0.1:1");
        let error = parser.parse("").await.unwrap_err();

        assert!(matches!(error, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_confidence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/confidence"))
            .and(query_param("url", ARTICLE_URL))
            .and(query_param("token", "token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": ARTICLE_URL,
                "confidence": 5.5
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let confidence = parser.confidence(ARTICLE_URL).await.unwrap();

        assert!((confidence.data - 5.5).abs() < f64::EPSILON);
        assert_eq!(confidence.raw.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_confidence_without_url_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/confidence"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"confidence": 5.5}"#))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let confidence = parser.confidence(ARTICLE_URL).await.unwrap().into_data();

        assert!((confidence - 5.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_confidence_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/confidence"))
            .respond_with(ResponseTemplate::new(200).set_body_string("foo"))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let error = parser.confidence(ARTICLE_URL).await.unwrap_err();

        assert!(error.is_decode_error());
        assert!(!error.is_http_error());
    }

    #[tokio::test]
    async fn test_confidence_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/confidence"))
            .respond_with(ResponseTemplate::new(500).set_body_string("foo"))
            .mount(&mock_server)
            .await;

        let parser = create_parser(&mock_server.uri());
        let error = parser.confidence(ARTICLE_URL).await.unwrap_err();

        assert!(error.is_http_error());
        assert_eq!(error.status().unwrap().as_u16(), 500);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let parser = create_parser("http://127.0.0.1:1");
        let debug = format!("{parser:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("\"token\""));
    }
}
