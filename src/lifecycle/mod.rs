//! Lifecycle layer for end-of-life checks
//!
//! This module fetches, caches and interprets endoflife.date lifecycle records
//! and answers whether a given version of a technology is still supported.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ DataSource  │────▶│  EolClient  │◀────│SnapshotStore│
//! │  (fetch)    │     │  (query)    │     │ (per day)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Sources   │     │  Resolver   │────▶│ Constraint  │
//! │(endoflife)  │     │(version→cyc)│     │(cycle match)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: Per-day snapshot store and its disk implementation
//! - [`constraint`]: Cycle strings parsed as version constraints
//! - [`dates`]: Lifecycle date parsing and calendar differences
//! - [`error`]: Source, cache, lifecycle and query errors
//! - [`product`]: Lifecycle record model with polymorphic fields
//! - [`query`]: The `EolClient` facade
//! - [`resolver`]: Version-to-cycle resolution
//! - [`semver`]: Lenient version parsing
//! - [`source`]: DataSource trait for fetching raw payloads
//! - [`sources`]: Concrete data source implementations

pub mod cache;
pub mod constraint;
pub mod dates;
pub mod error;
pub mod product;
pub mod query;
pub mod resolver;
pub mod semver;
pub mod source;
pub mod sources;
