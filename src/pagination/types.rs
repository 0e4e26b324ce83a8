//! Pagination types
//!
//! Query keys, the observable pagination state, and the state transitions the
//! controller applies to it. Transitions are synchronous; the only suspension
//! point in a load is the fetch between `begin_*` and `finish`.

use crate::error::{Error, ErrorKind};
use crate::fetch::Page;
use crate::store::ResultStore;
use serde::{Deserialize, Serialize};

/// Page size used when none is configured (the Jikan maximum)
pub const DEFAULT_PAGE_SIZE: u32 = 25;

// ============================================================================
// QueryKey
// ============================================================================

/// Search term plus page cursor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    /// Trimmed search term; empty means "everything"
    pub search_term: String,
    /// 1-based page number
    pub page: u32,
    /// Items requested per page
    pub page_size: u32,
}

impl QueryKey {
    /// First page of a search
    pub fn reset(search_term: &str, page_size: u32) -> Self {
        Self {
            search_term: normalize_term(search_term),
            page: 1,
            page_size,
        }
    }

    /// The page after this one, same term and size
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            search_term: self.search_term.clone(),
            page: self.page + 1,
            page_size: self.page_size,
        }
    }

    /// Whether this is the first page of its search
    pub fn is_first_page(&self) -> bool {
        self.page == 1
    }
}

/// Trim a raw search term. No other validation is applied.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_string()
}

// ============================================================================
// Outcomes
// ============================================================================

/// Which kind of load a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First page of a (new) search
    Initial,
    /// A following page of the active search
    More,
}

/// Identifies an outstanding request so its response can be checked for staleness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    /// Generation of the search the request was issued under
    pub generation: u64,
    /// Initial or load-more
    pub kind: RequestKind,
    /// What was requested
    pub key: QueryKey,
}

/// Why a load call did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An initial load is already outstanding
    InitialInFlight,
    /// A load-more request is already outstanding
    MoreInFlight,
    /// The API reported no further pages (or no search has succeeded yet)
    NoMorePages,
}

/// Result of a load call, as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was merged; `added` new items were stored
    Applied {
        /// Items that were not already present
        added: usize,
    },
    /// The call returned without issuing a request
    Skipped(SkipReason),
    /// A response arrived for a superseded request and was dropped
    Stale,
    /// The request failed; see [`PaginationState::last_error`]
    Failed(ErrorKind),
}

impl LoadOutcome {
    /// Check if the response was applied
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Check if the call was a no-op
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Most recent load failure, kept for the UI to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Page whose request failed
    pub page: u32,
}

impl LastError {
    fn from_error(error: &Error, page: u32) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            page,
        }
    }
}

/// Coarse phase derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    /// No search has produced data
    Idle,
    /// First page of a search is in flight
    LoadingInitial,
    /// A following page is in flight
    LoadingMore,
    /// Data loaded and more pages are available
    Ready,
    /// Data loaded and the API reported the last page
    Exhausted,
}

// ============================================================================
// PaginationState
// ============================================================================

/// Everything the UI needs to render a result list
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    /// Accumulated, de-duplicated items
    pub store: ResultStore,
    /// Last page merged into the store (1 after a reset)
    pub current_page: u32,
    /// Whether another page may be requested
    pub has_more: bool,
    /// First page of the active search is in flight
    pub is_loading_initial: bool,
    /// A following page is in flight
    pub is_loading_more: bool,
    /// Search term the store belongs to
    pub active_search_term: String,
    /// Most recent failure, cleared by the next successful load or reset
    pub last_error: Option<LastError>,
    /// Bumped on every reset; responses from older generations are dropped
    pub generation: u64,
    /// The first page of the active search has been merged
    pub loaded: bool,
    /// Items requested per page
    pub page_size: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// Fresh state; nothing to load more of until a search is submitted
    pub fn new(page_size: u32) -> Self {
        Self {
            store: ResultStore::new(),
            current_page: 1,
            has_more: false,
            is_loading_initial: false,
            is_loading_more: false,
            active_search_term: String::new(),
            last_error: None,
            generation: 0,
            loaded: false,
            page_size,
        }
    }

    /// Key of the last merged page
    pub fn current_key(&self) -> QueryKey {
        QueryKey {
            search_term: self.active_search_term.clone(),
            page: self.current_page,
            page_size: self.page_size,
        }
    }

    /// Whether any request is outstanding
    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }

    /// Current phase
    pub fn phase(&self) -> LoadPhase {
        if self.is_loading_initial {
            LoadPhase::LoadingInitial
        } else if self.is_loading_more {
            LoadPhase::LoadingMore
        } else if !self.loaded {
            LoadPhase::Idle
        } else if self.has_more {
            LoadPhase::Ready
        } else {
            LoadPhase::Exhausted
        }
    }

    /// Reset for a new search and issue its first-page ticket
    pub(crate) fn begin_initial(&mut self, search_term: &str) -> RequestTicket {
        let key = QueryKey::reset(search_term, self.page_size);
        let generation = self.reset(&key);

        RequestTicket {
            generation,
            kind: RequestKind::Initial,
            key,
        }
    }

    /// Reset for a new search whose first page is `key`; returns the new generation.
    ///
    /// Clears the store and both loading flags, so an outstanding load-more
    /// from the previous search can no longer land.
    pub(crate) fn reset(&mut self, key: &QueryKey) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.store.clear();
        self.current_page = 1;
        self.has_more = true;
        self.is_loading_initial = true;
        self.is_loading_more = false;
        self.active_search_term = key.search_term.clone();
        self.last_error = None;
        self.loaded = false;

        self.generation
    }

    /// Issue a ticket for the next page, or say why not
    pub(crate) fn begin_more(&mut self) -> Result<RequestTicket, SkipReason> {
        if self.is_loading_initial {
            return Err(SkipReason::InitialInFlight);
        }
        if self.is_loading_more {
            return Err(SkipReason::MoreInFlight);
        }
        if !self.has_more {
            return Err(SkipReason::NoMorePages);
        }

        self.is_loading_more = true;

        Ok(RequestTicket {
            generation: self.generation,
            kind: RequestKind::More,
            key: self.current_key().next(),
        })
    }

    /// Whether a response for `ticket` still belongs to this state
    pub(crate) fn accepts(&self, ticket: &RequestTicket) -> bool {
        if ticket.generation != self.generation
            || ticket.key.search_term != self.active_search_term
        {
            return false;
        }

        match ticket.kind {
            RequestKind::Initial => self.is_loading_initial && ticket.key.is_first_page(),
            RequestKind::More => {
                self.is_loading_more && ticket.key.page == self.current_page + 1
            }
        }
    }

    /// Merge a successful response. The caller has already checked [`Self::accepts`].
    pub(crate) fn apply_page(&mut self, ticket: &RequestTicket, page: Page) -> LoadOutcome {
        let added = self.store.merge_in_place(page.items);
        self.has_more = page.has_next_page;
        self.last_error = None;

        match ticket.kind {
            RequestKind::Initial => {
                self.is_loading_initial = false;
                self.loaded = true;
            }
            RequestKind::More => {
                self.is_loading_more = false;
                self.current_page = ticket.key.page;
            }
        }

        LoadOutcome::Applied { added }
    }

    /// Record a failed response. The caller has already checked [`Self::accepts`].
    ///
    /// A failed first page leaves nothing to continue from, so `has_more` drops
    /// until the search is submitted again. A failed later page keeps the
    /// cursor where it was so the same page is requested next time.
    pub(crate) fn apply_failure(&mut self, ticket: &RequestTicket, error: &Error) -> LoadOutcome {
        self.last_error = Some(LastError::from_error(error, ticket.key.page));

        match ticket.kind {
            RequestKind::Initial => {
                self.is_loading_initial = false;
                self.has_more = false;
            }
            RequestKind::More => {
                self.is_loading_more = false;
            }
        }

        LoadOutcome::Failed(error.kind())
    }
}
