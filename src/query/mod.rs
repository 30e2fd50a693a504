//! Filter expression resolution
//!
//! Turns an already-parsed predicate tree into the set of series IDs it
//! matches, per metric and time range:
//!
//! ```text
//! Predicate tree
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Evaluate   │  depth-first walk, leaves resolved via the gateway
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Combine    │  AND/OR/ANDNOT set algebra, bottom-up
//! └─────────────┘
//!      │
//!      ▼
//!  SeriesIdSet (or the first error, which voids the whole run)
//! ```
//!
//! Parsing the query string into the tree happens upstream; this module
//! consumes the tree as-is.

pub mod predicate;
pub mod search;

// Re-export main types
pub use predicate::{BinaryOp, Predicate};
pub use search::SeriesSearch;
