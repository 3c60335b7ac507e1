//! JSON-over-HTTP client with GitHub error classification.

use anyhow::Result;
use log::debug;
use reqwest::{Client, RequestBuilder, header::ACCEPT};
use serde::de::DeserializeOwned;

use super::error::{FetchError, classify_error, classify_status};

/// Thin wrapper over a reqwest `Client`.
///
/// Every failure comes back as an `anyhow::Error` carrying a
/// [`FetchError`]. Requests are made exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);
        self.send_json(self.client.get(url), url).await
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);
        self.send_json(self.client.get(url).query(query), url).await
    }

    /// Same as [`get_json_with_query`](Self::get_json_with_query) but asks for a
    /// specific media type, e.g. `application/vnd.github.star+json`.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_accept<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &str,
    ) -> Result<T> {
        debug!("GET {} from {} with query {:?}...", accept, url, query);
        let request = self.client.get(url).query(query).header(ACCEPT, accept);
        self.send_json(request, url).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| classify_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_status(status, url, &body).unwrap_or_else(|| {
                FetchError::FetchFailed(format!("HTTP {} from {}", status.as_u16(), url))
            });
            debug!("GET {} failed: {}", url, error);
            return Err(error.into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| classify_error(e, url))
    }
}
