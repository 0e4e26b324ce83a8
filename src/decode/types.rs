//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use crate::fetch::Page;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where to find things in a search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Dotted path to the item array (empty = the body itself is the array)
    pub items_path: String,
    /// Dotted path to the boolean continuation flag
    pub has_next_path: Option<String>,
    /// Field holding each item's id
    pub id_field: String,
    /// Field holding each item's category, if the API has one
    pub category_field: Option<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            items_path: "data".to_string(),
            has_next_path: Some("pagination.has_next_page".to_string()),
            id_field: "mal_id".to_string(),
            category_field: Some("rating".to_string()),
        }
    }
}

impl DecoderConfig {
    /// Create a decoder config with an item path
    pub fn with_items_path(path: impl Into<String>) -> Self {
        Self {
            items_path: path.into(),
            ..Default::default()
        }
    }

    /// Set the continuation flag path
    #[must_use]
    pub fn has_next_path(mut self, path: impl Into<String>) -> Self {
        self.has_next_path = Some(path.into());
        self
    }

    /// Infer continuation from page fullness instead of a response field
    #[must_use]
    pub fn without_has_next_path(mut self) -> Self {
        self.has_next_path = None;
        self
    }

    /// Set the id field
    #[must_use]
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Set the category field
    #[must_use]
    pub fn category_field(mut self, field: impl Into<String>) -> Self {
        self.category_field = Some(field.into());
        self
    }
}

/// Trait for decoding response bodies
pub trait PageDecoder: Send + Sync {
    /// Decode a search response into a page.
    ///
    /// `page_size` is what was asked for; it is used to guess continuation
    /// when the response carries no explicit flag.
    fn decode_page(&self, body: &str, page_size: u32) -> Result<Page>;

    /// Decode a single-record response, returning the object at `path`
    fn decode_record(&self, body: &str, path: &str) -> Result<Value>;
}
