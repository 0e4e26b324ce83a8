//! Decoder implementations

use super::types::{DecoderConfig, PageDecoder};
use crate::error::{Error, Result};
use crate::fetch::Page;
use crate::types::{Item, ItemId};
use serde_json::Value;

// ============================================================================
// JSON Page Decoder
// ============================================================================

/// JSON decoder for paginated search responses
#[derive(Debug, Clone, Default)]
pub struct JsonPageDecoder {
    config: DecoderConfig,
}

impl JsonPageDecoder {
    /// Create a decoder with the default (Jikan-shaped) paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom paths
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Get the decoder config
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Convert one raw JSON entry into an [`Item`]
    pub fn decode_item(&self, raw: Value, index: usize) -> Result<Item> {
        let id = raw
            .get(&self.config.id_field)
            .and_then(parse_id)
            .ok_or_else(|| {
                Error::decode(format!(
                    "item {index} has no usable '{}' field",
                    self.config.id_field
                ))
            })?;

        let category = self
            .config
            .category_field
            .as_deref()
            .and_then(|field| raw.get(field))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Item {
            id,
            category,
            payload: raw,
        })
    }

    fn extract_has_next(&self, body: &Value, items_len: usize, page_size: u32) -> Result<bool> {
        let fallback = page_size > 0 && items_len >= page_size as usize;

        let Some(path) = self.config.has_next_path.as_deref() else {
            return Ok(fallback);
        };

        match extract_path(body, path) {
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(Value::Null) | None => Ok(fallback),
            Some(other) => Err(Error::extraction(
                path,
                format!("expected a boolean, found {other}"),
            )),
        }
    }
}

impl PageDecoder for JsonPageDecoder {
    fn decode_page(&self, body: &str, page_size: u32) -> Result<Page> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        let raw_items = match extract_path(&value, &self.config.items_path) {
            Some(Value::Array(arr)) => arr.clone(),
            Some(other) => {
                return Err(Error::extraction(
                    &self.config.items_path,
                    format!("expected an array, found {}", type_name(other)),
                ))
            }
            None => {
                return Err(Error::extraction(
                    &self.config.items_path,
                    "path not present in response",
                ))
            }
        };

        let has_next_page = self.extract_has_next(&value, raw_items.len(), page_size)?;

        let items = raw_items
            .into_iter()
            .enumerate()
            .map(|(index, raw)| self.decode_item(raw, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            has_next_page,
        })
    }

    fn decode_record(&self, body: &str, path: &str) -> Result<Value> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        match extract_path(&value, path) {
            Some(record @ Value::Object(_)) => Ok(record.clone()),
            Some(other) => Err(Error::extraction(
                path,
                format!("expected an object, found {}", type_name(other)),
            )),
            None => Err(Error::extraction(path, "path not present in response")),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Walk a dotted path (`a.b[0].c`, optional `$.` prefix) through a JSON value.
///
/// An empty path (or `$`) returns the value itself.
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                usize::try_from(arr.len() as i64 + index).ok()?
            } else {
                usize::try_from(index).ok()?
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}

/// Accept numeric ids and numeric strings
fn parse_id(value: &Value) -> Option<ItemId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
