//! Filter view implementation

use crate::pagination::PaginationState;
use crate::store::ResultStore;
use crate::types::Item;
use std::collections::BTreeSet;

/// Categories shown when nothing else is configured
pub const DEFAULT_ALLOWED_CATEGORIES: [&str; 2] = ["safe", "suggestive"];

/// Stable filter of `store` by category.
///
/// An empty `allowed` set shows everything. Uncategorized items are shown
/// only when `include_uncategorized` is set.
pub fn visible<'a>(
    store: &'a ResultStore,
    allowed: &BTreeSet<String>,
    include_uncategorized: bool,
) -> Vec<&'a Item> {
    store
        .iter()
        .filter(|item| is_allowed(item, allowed, include_uncategorized))
        .collect()
}

fn is_allowed(item: &Item, allowed: &BTreeSet<String>, include_uncategorized: bool) -> bool {
    if allowed.is_empty() {
        return true;
    }
    match item.category.as_deref() {
        Some(category) => allowed.contains(category),
        None => include_uncategorized,
    }
}

/// What the result screen should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// First page in flight and nothing to show yet
    Loading,
    /// No search has been run
    NotLoaded,
    /// The first page failed; carries the message
    Failed(String),
    /// The search returned nothing
    NoResults,
    /// Items were loaded but every one was filtered out
    AllFiltered {
        /// Items held back by the filter
        hidden: usize,
    },
    /// Items to render
    Items {
        /// Visible items
        visible: usize,
        /// Items held back by the filter
        hidden: usize,
    },
}

/// Category filter configured once per screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    allowed: BTreeSet<String>,
    include_uncategorized: bool,
}

impl Default for FilterView {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_CATEGORIES)
    }
}

impl FilterView {
    /// Create a filter allowing the given categories
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            include_uncategorized: true,
        }
    }

    /// A filter that lets everything through
    pub fn allow_all() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Choose whether items without a category are shown
    #[must_use]
    pub fn include_uncategorized(mut self, include: bool) -> Self {
        self.include_uncategorized = include;
        self
    }

    /// Allowed categories
    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    /// Whether a single item passes
    pub fn allows(&self, item: &Item) -> bool {
        is_allowed(item, &self.allowed, self.include_uncategorized)
    }

    /// Visible items in store order
    pub fn visible<'a>(&self, store: &'a ResultStore) -> Vec<&'a Item> {
        visible(store, &self.allowed, self.include_uncategorized)
    }

    /// Classify what the UI should render for `state`
    pub fn display_state(&self, state: &PaginationState) -> DisplayState {
        let total = state.store.len();
        let shown = state.store.iter().filter(|item| self.allows(item)).count();
        let hidden = total - shown;

        if shown > 0 {
            return DisplayState::Items {
                visible: shown,
                hidden,
            };
        }
        if state.is_loading_initial {
            return DisplayState::Loading;
        }
        if total > 0 {
            return DisplayState::AllFiltered { hidden };
        }
        if let Some(error) = &state.last_error {
            if !state.loaded {
                return DisplayState::Failed(error.message.clone());
            }
        }
        if state.loaded {
            DisplayState::NoResults
        } else {
            DisplayState::NotLoaded
        }
    }
}
