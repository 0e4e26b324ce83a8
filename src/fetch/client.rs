//! HTTP-backed fetch client

use super::types::{FetchClient, Page};
use crate::decode::{JsonPageDecoder, PageDecoder};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::QueryKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Describes the remote search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchEndpoint {
    /// Path appended to the client's base URL
    pub path: String,
    /// Query parameter carrying the search term
    pub search_param: String,
    /// Query parameter carrying the 1-based page number
    pub page_param: String,
    /// Query parameter carrying the page size
    pub page_size_param: Option<String>,
}

impl Default for SearchEndpoint {
    fn default() -> Self {
        Self {
            path: "/characters".to_string(),
            search_param: "q".to_string(),
            page_param: "page".to_string(),
            page_size_param: Some("limit".to_string()),
        }
    }
}

impl SearchEndpoint {
    /// Create an endpoint description for a path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Build the request for a query key.
    ///
    /// An empty search term sends no search parameter at all.
    pub fn request_for(&self, key: &QueryKey) -> RequestConfig {
        let mut request = RequestConfig::new().query(&self.page_param, key.page.to_string());

        if !key.search_term.is_empty() {
            request = request.query(&self.search_param, &key.search_term);
        }

        if let Some(param) = &self.page_size_param {
            request = request.query(param, key.page_size.to_string());
        }

        request
    }
}

/// [`FetchClient`] that talks to a JSON search API over HTTP
#[derive(Debug)]
pub struct HttpFetchClient {
    http: HttpClient,
    endpoint: SearchEndpoint,
    decoder: JsonPageDecoder,
}

impl HttpFetchClient {
    /// Create a fetch client
    pub fn new(http: HttpClient, endpoint: SearchEndpoint, decoder: JsonPageDecoder) -> Self {
        Self {
            http,
            endpoint,
            decoder,
        }
    }

    /// Get the endpoint description
    pub fn endpoint(&self) -> &SearchEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch_page(&self, key: &QueryKey) -> Result<Page> {
        let request = self.endpoint.request_for(key);
        let body = self.http.get_text_with_config(&self.endpoint.path, request).await?;
        let page = self.decoder.decode_page(&body, key.page_size)?;

        debug!(
            term = %key.search_term,
            page = key.page,
            items = page.items.len(),
            has_next = page.has_next_page,
            "Fetched page"
        );

        Ok(page)
    }
}
