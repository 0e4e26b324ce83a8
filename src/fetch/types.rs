//! Fetch types and traits

use crate::error::Result;
use crate::pagination::QueryKey;
use crate::types::{Item, ItemId};
use async_trait::async_trait;

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in API order, possibly overlapping earlier pages
    pub items: Vec<Item>,
    /// Whether the API reports another page after this one
    pub has_next_page: bool,
}

impl Page {
    /// Create a page
    pub fn new(items: Vec<Item>, has_next_page: bool) -> Self {
        Self {
            items,
            has_next_page,
        }
    }

    /// The final page of a result set
    pub fn last(items: Vec<Item>) -> Self {
        Self::new(items, false)
    }

    /// Ids in API order
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Performs a single page request.
///
/// Implementations own transport, auth and timeouts. They must not retry on
/// their own behalf; the controller decides what happens after a failure.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Fetch the page described by `key`
    async fn fetch_page(&self, key: &QueryKey) -> Result<Page>;
}
