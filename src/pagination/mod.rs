//! Pagination module
//!
//! Incremental loading of a paginated search into a de-duplicated store.
//!
//! # Overview
//!
//! - [`QueryKey`] - search term plus 1-based page cursor
//! - [`PaginationState`] - store, cursor, loading flags, has-more flag, last error
//! - [`PaginationController`] - `load_initial`, `load_more`, `on_search_submit`
//!
//! # Staleness
//!
//! Responses can complete in any order. Each request carries a
//! [`RequestTicket`] holding the search generation it was issued under and the
//! key it asked for; a response whose ticket no longer matches the state is
//! dropped without touching the store.

mod controller;
mod types;

pub use controller::PaginationController;
pub use types::{
    normalize_term, LastError, LoadOutcome, LoadPhase, PaginationState, QueryKey, RequestKind,
    RequestTicket, SkipReason, DEFAULT_PAGE_SIZE,
};
