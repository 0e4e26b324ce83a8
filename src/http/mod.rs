//! HTTP client module
//!
//! Provides a thin HTTP client over reqwest for the search, detail and
//! download paths.
//!
//! # Features
//!
//! - **Base URL joining**: endpoints are configured as paths
//! - **Default headers**: user agent and any API key headers
//! - **Status classification**: 4xx/5xx become [`Error::HttpStatus`](crate::Error::HttpStatus)
//!
//! The client performs exactly one attempt per call. Retrying is left to the
//! caller (for pagination, the user scrolling back to the end).

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
