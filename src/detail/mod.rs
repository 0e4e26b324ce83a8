//! Character detail module
//!
//! Single-record lookup for the detail screen: one character by id.

mod client;

pub use client::{parse_character_id, CharacterDetail, DetailClient, DetailEndpoint};
