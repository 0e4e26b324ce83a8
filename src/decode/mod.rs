//! Response decoder module
//!
//! Turns raw search and detail responses into [`Page`](crate::fetch::Page)s
//! and records.
//!
//! # Overview
//!
//! Each decoder pulls the item array, the continuation flag and the per-item
//! id/category out of a JSON body using dotted paths (`pagination.has_next_page`,
//! `data`, `images.jpg.image_url`). A body that does not have the configured
//! shape is a decode error, never an empty page.

mod decoders;
mod types;

pub use decoders::{extract_path, JsonPageDecoder};
pub use types::{DecoderConfig, PageDecoder};
