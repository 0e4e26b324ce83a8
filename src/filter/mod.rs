//! Filter module
//!
//! Client-side category filtering over the result store.
//!
//! # Overview
//!
//! [`FilterView`] derives the visible subset of a store from a fixed set of
//! allowed categories and never mutates the store. [`DisplayState`] tells the
//! UI which of its empty/loading/error/list screens applies.

mod view;

pub use view::{visible, DisplayState, FilterView, DEFAULT_ALLOWED_CATEGORIES};
