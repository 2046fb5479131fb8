//! Lifecycle support checks backed by the endoflife.date API.
//!
//! The [`lifecycle`] module holds the record model, the per-day disk cache, the
//! HTTP data source, the version resolver and the [`lifecycle::query::EolClient`]
//! facade tying them together. [`output`] renders resolved records for people
//! and files.

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod output;
