//! Fetch module
//!
//! The seam between the pagination controller and the remote search API.
//!
//! # Overview
//!
//! - [`FetchClient`] - one page request for a [`QueryKey`](crate::pagination::QueryKey)
//! - [`Page`] - decoded items plus the continuation flag
//! - [`HttpFetchClient`] - reqwest-backed implementation driven by [`SearchEndpoint`]

mod client;
mod types;

pub use client::{HttpFetchClient, SearchEndpoint};
pub use types::{FetchClient, Page};
