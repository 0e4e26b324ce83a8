//! Pagination controller
//!
//! Drives search resets and page advances against a [`FetchClient`].
//!
//! The state lives inside a `tokio::sync::watch` sender: every mutation goes
//! through `send_modify`/`send_if_modified`, so subscribers are notified of
//! exactly the calls that changed something. No borrow of the state is ever
//! held across the fetch `.await`, which lets several load calls on the same
//! controller run concurrently on one task (e.g. a search submitted while a
//! previous one is still in flight).

use super::types::{
    LoadOutcome, PaginationState, QueryKey, RequestKind, RequestTicket, SkipReason,
    DEFAULT_PAGE_SIZE,
};
use crate::error::Result;
use crate::fetch::{FetchClient, Page};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Incremental, de-duplicating pagination over a [`FetchClient`]
pub struct PaginationController {
    client: Arc<dyn FetchClient>,
    state: watch::Sender<PaginationState>,
    page_size: u32,
}

impl PaginationController {
    /// Create a controller with the default page size
    pub fn new(client: Arc<dyn FetchClient>) -> Self {
        Self::with_page_size(client, DEFAULT_PAGE_SIZE)
    }

    /// Create a controller with a custom page size
    pub fn with_page_size(client: Arc<dyn FetchClient>, page_size: u32) -> Self {
        let (state, _) = watch::channel(PaginationState::new(page_size));
        Self {
            client,
            state,
            page_size,
        }
    }

    /// Receive a notification after every state change
    pub fn subscribe(&self) -> watch::Receiver<PaginationState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PaginationState {
        self.state.borrow().clone()
    }

    /// Load the first page of `search_term`.
    ///
    /// Does nothing if an initial load is already in flight; use
    /// [`Self::on_search_submit`] to replace it.
    pub async fn load_initial(&self, search_term: &str) -> LoadOutcome {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if state.is_loading_initial {
                return false;
            }
            ticket = Some(state.begin_initial(search_term));
            true
        });

        match ticket {
            Some(ticket) => self.execute(ticket).await,
            None => {
                debug!(term = search_term.trim(), "Initial load already in flight, ignoring");
                LoadOutcome::Skipped(SkipReason::InitialInFlight)
            }
        }
    }

    /// Start a new search, superseding whatever is in flight
    pub async fn on_search_submit(&self, search_term: &str) -> LoadOutcome {
        let key = QueryKey::reset(search_term, self.page_size);
        let mut generation = 0;
        self.state.send_modify(|state| {
            if state.is_loading() {
                debug!(
                    previous = %state.active_search_term,
                    generation = state.generation,
                    "Superseding in-flight load"
                );
            }
            generation = state.reset(&key);
        });

        self.execute(RequestTicket {
            generation,
            kind: RequestKind::Initial,
            key,
        })
        .await
    }

    /// Load the page after the current one.
    ///
    /// Does nothing while any load is in flight or after the last page.
    pub async fn load_more(&self) -> LoadOutcome {
        let mut begun = Err(SkipReason::NoMorePages);
        self.state.send_if_modified(|state| {
            begun = state.begin_more();
            begun.is_ok()
        });

        match begun {
            Ok(ticket) => self.execute(ticket).await,
            Err(reason) => {
                debug!(?reason, "Load more skipped");
                LoadOutcome::Skipped(reason)
            }
        }
    }

    /// Dismiss the last error
    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|state| state.last_error.take().is_some());
    }

    async fn execute(&self, ticket: RequestTicket) -> LoadOutcome {
        debug!(
            term = %ticket.key.search_term,
            page = ticket.key.page,
            generation = ticket.generation,
            "Requesting page"
        );

        let result = self.client.fetch_page(&ticket.key).await;
        self.finish(&ticket, result)
    }

    fn finish(&self, ticket: &RequestTicket, result: Result<Page>) -> LoadOutcome {
        let mut outcome = LoadOutcome::Stale;

        self.state.send_if_modified(|state| {
            if !state.accepts(ticket) {
                return false;
            }
            outcome = match result {
                Ok(page) => state.apply_page(ticket, page),
                Err(ref error) => state.apply_failure(ticket, error),
            };
            true
        });

        match &outcome {
            LoadOutcome::Applied { added } => info!(
                term = %ticket.key.search_term,
                page = ticket.key.page,
                added,
                "Merged page"
            ),
            LoadOutcome::Stale => debug!(
                term = %ticket.key.search_term,
                page = ticket.key.page,
                generation = ticket.generation,
                "Dropped stale response"
            ),
            LoadOutcome::Failed(kind) => {
                let retry_hint = match ticket.kind {
                    RequestKind::Initial => "resubmit the search",
                    RequestKind::More => "load more again to retry",
                };
                warn!(
                    term = %ticket.key.search_term,
                    page = ticket.key.page,
                    %kind,
                    "Page request failed; {retry_hint}"
                );
            }
            LoadOutcome::Skipped(_) => {}
        }

        outcome
    }
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PaginationController")
            .field("active_search_term", &state.active_search_term)
            .field("current_page", &state.current_page)
            .field("items", &state.store.len())
            .field("phase", &state.phase())
            .finish_non_exhaustive()
    }
}
