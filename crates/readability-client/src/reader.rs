//! Reader API client.
//!
//! The Reader API manages a user's bookmarks and saved articles. Every request is
//! OAuth1-signed with the application's consumer pair and the user's token pair.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use readability_common::{Article, Credentials};

use crate::client::{Shared, endpoint};
use crate::error::{ClientError, Result};
use crate::oauth;
use crate::params::Params;
use crate::response::{ApiResponse, RawResponse};
use crate::transport::Transport;

/// Client for the Reader API, bound to one user.
///
/// Created with [`Client::new_reader_client`](crate::Client::new_reader_client).
/// Cheap to clone; clones share configuration and connection pool.
#[derive(Clone)]
pub struct ReaderClient {
    shared: Arc<Shared>,
    token: Credentials,
}

impl fmt::Debug for ReaderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderClient")
            .field("base_url", &self.shared.reader_base_url.as_str())
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl ReaderClient {
    pub(crate) const fn new(shared: Arc<Shared>, token: Credentials) -> Self {
        Self { shared, token }
    }

    /// The user token this client signs with.
    #[must_use]
    pub const fn token(&self) -> &Credentials {
        &self.token
    }

    /// Bookmarks `article_url` for the user.
    ///
    /// The service may answer without a body; the new bookmark's address is in the
    /// `Location` header, see [`RawResponse::location`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRequest`] if `article_url` is empty
    /// - [`ClientError::Http`] if the service answers with a status of 400 or above
    /// - [`ClientError::Network`] if the request could not be completed
    pub async fn add_bookmark(&self, article_url: &str) -> Result<RawResponse> {
        if article_url.is_empty() {
            return Err(ClientError::InvalidRequest(
                "article URL must not be empty".to_string(),
            ));
        }
        self.post("/bookmarks", Params::new().with("url", article_url))
            .await
    }

    /// Retrieves a saved article and its content.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRequest`] if `article_id` is empty
    /// - [`ClientError::Http`] if the service answers with a status of 400 or above
    /// - [`ClientError::Decode`] if the body is not an article
    /// - [`ClientError::Network`] if the request could not be completed
    pub async fn get_article(&self, article_id: &str) -> Result<ApiResponse<Article>> {
        if article_id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "article id must not be empty".to_string(),
            ));
        }
        // The id is a single path segment even if it contains a slash
        let url = endpoint(&self.shared.reader_base_url, &["articles", article_id]);
        let response = self.signed_get(url, Params::new()).await?;
        Transport::decode_json(response)
    }

    /// Signed GET of `path` below the Reader API base URL.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] for a status of 400 or above, [`ClientError::Network`] if
    /// the request could not be completed.
    pub async fn get(&self, path: &str, query: Params) -> Result<RawResponse> {
        let url = self.path_url(path);
        self.signed_get(url, query).await
    }

    /// Signed GET of `path`, decoding the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get), plus [`ClientError::Decode`] if the body does not fit `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Params,
    ) -> Result<ApiResponse<T>> {
        let response = self.get(path, query).await?;
        Transport::decode_json(response)
    }

    /// Signed form POST to `path` below the Reader API base URL.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] for a status of 400 or above, [`ClientError::Network`] if
    /// the request could not be completed.
    pub async fn post(&self, path: &str, form: Params) -> Result<RawResponse> {
        let url = self.path_url(path);
        let form = oauth::sign_for_post(&self.shared.config.consumer, Some(&self.token), &url, form);
        self.shared.transport.post(url, &form).await
    }

    async fn signed_get(&self, url: Url, query: Params) -> Result<RawResponse> {
        let query = oauth::sign_for_get(&self.shared.config.consumer, Some(&self.token), &url, query);
        self.shared.transport.get(url, &query).await
    }

    fn path_url(&self, path: &str) -> Url {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        endpoint(&self.shared.reader_base_url, &segments)
    }
}
