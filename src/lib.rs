// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # gallery-feed
//!
//! Client-side pagination and de-duplication for paginated gallery APIs.
//!
//! ## Features
//!
//! - **Incremental loading**: first page on search submit, further pages on demand
//! - **De-duplication**: items are keyed by id; the first copy seen wins
//! - **Stale response handling**: answers for superseded searches are dropped
//! - **Category filtering**: a view over loaded items, never a refetch
//! - **Asset download**: streamed to disk, independent of pagination state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gallery_feed::{FeedConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = FeedConfig::default();
//!     let controller = config.controller(config.http_client()?);
//!
//!     controller.on_search_submit("naruto").await;
//!     controller.load_more().await;
//!
//!     let state = controller.snapshot();
//!     for item in config.filter_view().visible(&state.store) {
//!         println!("{}", item.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    PaginationController                       │
//! │  on_search_submit()   load_initial()   load_more()            │
//! │  watch::Receiver<PaginationState> for change notifications    │
//! └──────────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴──────────┐      ┌────────────┴───────────────┐
//! │ FetchClient             │      │ ResultStore / FilterView    │
//! │  HttpFetchClient        │      │  merge by id, first wins    │
//! │  JsonPageDecoder        │      │  category allow-set         │
//! └─────────────────────────┘      └────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client
pub mod http;

/// Response decoders
pub mod decode;

/// Page fetching
pub mod fetch;

/// De-duplicating result store
pub mod store;

/// Pagination state machine
pub mod pagination;

/// Category filtering
pub mod filter;

/// Asset downloads
pub mod download;

/// Character detail lookup
pub mod detail;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::FeedConfig;
pub use error::{Error, ErrorKind, Result};
pub use fetch::{FetchClient, Page};
pub use pagination::{LoadOutcome, PaginationController, PaginationState, QueryKey};
pub use store::{merge, ResultStore};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
