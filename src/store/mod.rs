//! Result store module
//!
//! Ordered, id-unique accumulation of items across page merges.
//!
//! # Overview
//!
//! - [`merge`] - pure merge-append of two item sequences
//! - [`ResultStore`] - owning store that keeps the id set alongside the sequence

mod result_store;

pub use result_store::{merge, ResultStore};
