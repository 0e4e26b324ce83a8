//! Detail client implementation

use crate::decode::{extract_path, JsonPageDecoder, PageDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Describes the remote detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailEndpoint {
    /// Path prefix; the id is appended as the last segment
    pub path: String,
    /// Dotted path to the record inside the response
    pub record_path: String,
}

impl Default for DetailEndpoint {
    fn default() -> Self {
        Self {
            path: "/characters".to_string(),
            record_path: "data".to_string(),
        }
    }
}

impl DetailEndpoint {
    /// Path for one character
    pub fn path_for(&self, id: ItemId) -> String {
        format!("{}/{id}", self.path.trim_end_matches('/'))
    }
}

/// What the detail screen shows about a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDetail {
    pub mal_id: ItemId,
    pub name: String,
    pub name_kanji: Option<String>,
    pub nicknames: Vec<String>,
    pub favorites: u64,
    pub about: Option<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

impl CharacterDetail {
    /// Build from a raw character record
    pub fn from_record(record: &Value) -> Result<Self> {
        let mal_id = record
            .get("mal_id")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::decode("character record has no numeric 'mal_id'"))?;
        let name = string_at(record, "name")
            .ok_or_else(|| Error::decode(format!("character {mal_id} has no 'name'")))?;

        let nicknames = record
            .get("nicknames")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            mal_id,
            name,
            name_kanji: string_at(record, "name_kanji"),
            nicknames,
            favorites: record
                .get("favorites")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            about: string_at(record, "about"),
            image_url: string_at(record, "images.jpg.image_url"),
            url: string_at(record, "url"),
        })
    }

    /// Nicknames as a parenthesized list, or `None` when there are none
    pub fn nickname_line(&self) -> Option<String> {
        if self.nicknames.is_empty() {
            None
        } else {
            Some(format!("({})", self.nicknames.join(", ")))
        }
    }
}

fn string_at(record: &Value, path: &str) -> Option<String> {
    extract_path(record, path)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse an id received as a route parameter
pub fn parse_character_id(raw: &str) -> Result<ItemId> {
    let trimmed = raw.trim();
    trimmed
        .parse::<ItemId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::invalid_id(raw))
}

/// Fetches single character records
#[derive(Debug, Clone)]
pub struct DetailClient {
    http: HttpClient,
    endpoint: DetailEndpoint,
    decoder: JsonPageDecoder,
}

impl DetailClient {
    /// Create a detail client
    pub fn new(http: HttpClient, endpoint: DetailEndpoint) -> Self {
        Self {
            http,
            endpoint,
            decoder: JsonPageDecoder::new(),
        }
    }

    /// Fetch one character
    pub async fn fetch(&self, id: ItemId) -> Result<CharacterDetail> {
        let path = self.endpoint.path_for(id);
        let body = self
            .http
            .get_text_with_config(&path, RequestConfig::new())
            .await?;
        let record = self.decoder.decode_record(&body, &self.endpoint.record_path)?;

        debug!(id, "Fetched character detail");
        CharacterDetail::from_record(&record)
    }

    /// Validate a raw id parameter and fetch it; invalid ids never hit the network
    pub async fn fetch_param(&self, raw_id: &str) -> Result<CharacterDetail> {
        let id = parse_character_id(raw_id)?;
        self.fetch(id).await
    }
}
