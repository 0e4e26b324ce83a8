//! Configuration
//!
//! Describes the remote API and the client-side defaults in one YAML document.
//! Every field has a default, so an empty document (or no file at all) yields
//! a working configuration for the public Jikan API.
//!
//! ```yaml
//! base_url: https://api.jikan.moe/v4
//! page_size: 25
//! search:
//!   path: /characters
//!   search_param: q
//! response:
//!   items_path: data
//!   has_next_path: pagination.has_next_page
//!   id_field: mal_id
//! filter:
//!   allowed_categories: [safe, suggestive]
//! ```

use crate::decode::{DecoderConfig, JsonPageDecoder};
use crate::detail::{DetailClient, DetailEndpoint};
use crate::download::HttpAssetDownloader;
use crate::error::{Error, Result};
use crate::fetch::{HttpFetchClient, SearchEndpoint};
use crate::filter::{FilterView, DEFAULT_ALLOWED_CATEGORIES};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{PaginationController, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Search endpoint
    #[serde(default)]
    pub search: SearchEndpoint,

    /// Search response shape
    #[serde(default)]
    pub response: DecoderConfig,

    /// Detail endpoint
    #[serde(default)]
    pub detail: DetailEndpoint,

    /// Category filter
    #[serde(default)]
    pub filter: FilterSettings,

    /// Asset downloads
    #[serde(default)]
    pub download: DownloadSettings,
}

fn default_base_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            http: HttpSettings::default(),
            search: SearchEndpoint::default(),
            response: DecoderConfig::default(),
            detail: DetailEndpoint::default(),
            filter: FilterSettings::default(),
            download: DownloadSettings::default(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Override the user agent
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

/// Category filter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Categories to show; empty shows everything
    #[serde(default = "default_allowed_categories")]
    pub allowed_categories: Vec<String>,

    /// Whether items without a category are shown
    #[serde(default = "default_true")]
    pub include_uncategorized: bool,
}

fn default_allowed_categories() -> Vec<String> {
    DEFAULT_ALLOWED_CATEGORIES
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            allowed_categories: default_allowed_categories(),
            include_uncategorized: true,
        }
    }
}

/// Download settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Directory assets are written to
    #[serde(default = "default_download_dir")]
    pub directory: PathBuf,

    /// Whole-file timeout in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_download_timeout_secs() -> u64 {
    300
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            directory: default_download_dir(),
            timeout_secs: default_download_timeout_secs(),
        }
    }
}

// ============================================================================
// Loading and building
// ============================================================================

impl FeedConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: FeedConfig = if yaml.trim().is_empty() {
            FeedConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", base.scheme()),
            ));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if self.download.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "download.timeout_secs",
                "must be at least 1",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be at least 1"));
        }
        if self.response.id_field.trim().is_empty() {
            return Err(Error::invalid_value("response.id_field", "must not be empty"));
        }
        if self.search.page_param.trim().is_empty() {
            return Err(Error::invalid_value("search.page_param", "must not be empty"));
        }
        Ok(())
    }

    /// HTTP client configuration for this API
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs));

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Build the shared HTTP client
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_config(self.http_client_config())
    }

    /// Build the search fetch client
    pub fn fetch_client(&self, http: HttpClient) -> HttpFetchClient {
        HttpFetchClient::new(
            http,
            self.search.clone(),
            JsonPageDecoder::with_config(self.response.clone()),
        )
    }

    /// Build a pagination controller over the configured search endpoint
    pub fn controller(&self, http: HttpClient) -> PaginationController {
        PaginationController::with_page_size(Arc::new(self.fetch_client(http)), self.page_size)
    }

    /// Build the detail client
    pub fn detail_client(&self, http: HttpClient) -> DetailClient {
        DetailClient::new(http, self.detail.clone())
    }

    /// HTTP client configuration for asset hosts.
    ///
    /// No base URL and none of the API headers; only the user agent carries over.
    pub fn download_http_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.download.timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Build the asset downloader with its own HTTP client
    pub fn downloader(&self) -> Result<HttpAssetDownloader> {
        let http = HttpClient::with_config(self.download_http_config())?;
        Ok(HttpAssetDownloader::new(http, &self.download.directory))
    }

    /// Build the category filter
    pub fn filter_view(&self) -> FilterView {
        FilterView::new(self.filter.allowed_categories.iter().cloned())
            .include_uncategorized(self.filter.include_uncategorized)
    }
}
