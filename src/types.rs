//! Common types used throughout gallery-feed
//!
//! This module contains shared type definitions, type aliases,
//! and the [`Item`] entity that flows through every layer.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Identity of an item as assigned by the remote API
pub type ItemId = u64;

// ============================================================================
// Item
// ============================================================================

/// A single entry returned by the remote search endpoint.
///
/// Identity is `id` only: two items with the same id are the same entity,
/// whatever their payloads say. The first one seen is the one kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique id
    pub id: ItemId,
    /// Content category (the API's rating), used for client-side filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Everything else the API returned, untouched
    #[serde(default)]
    pub payload: JsonValue,
}

impl Item {
    /// Create an item with no category
    pub fn new(id: ItemId, payload: JsonValue) -> Self {
        Self {
            id,
            category: None,
            payload,
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Look up a string field in the payload by dotted path
    pub fn field_str(&self, path: &str) -> Option<&str> {
        let mut current = &self.payload;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        current.as_str()
    }

    /// Best-effort asset URL for this item
    pub fn asset_url(&self) -> Option<&str> {
        self.field_str("url")
            .or_else(|| self.field_str("image_url"))
            .or_else(|| self.field_str("images.jpg.image_url"))
    }

    /// Tags attached to the item, if the payload has a `tags` array
    pub fn tags(&self) -> Vec<&str> {
        self.payload
            .get("tags")
            .and_then(JsonValue::as_array)
            .map(|tags| tags.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Display helpers
// ============================================================================

/// Turn an API tag like `long_hair` into a caption like `Long hair`.
///
/// Only the first character is upper-cased; underscores after it become spaces.
pub fn format_tag(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => {
            let mut caption: String = first.to_uppercase().collect();
            caption.extend(chars.map(|c| if c == '_' { ' ' } else { c }));
            caption
        }
        None => String::new(),
    }
}
