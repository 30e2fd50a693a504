//! Series identifier resolution for tag-filtered time-series queries
//!
//! This library resolves a parsed filter expression (tag predicates
//! joined by AND/OR/NOT) against a per-metric inverted index into the
//! concrete set of matching series identifiers, partitioned by storage
//! version. It is the layer between a query parser (which produces the
//! predicate tree) and the scan/aggregation stages (which consume the
//! identifier set).
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use series_search::{MemoryIndex, Predicate, SeriesSearch, TimeRange};
//!
//! let index = Arc::new(MemoryIndex::new());
//! index.add_series(1, 11, 1, 1000, &[("host", "server-01")]);
//! index.add_series(1, 11, 2, 1000, &[("host", "server-02")]);
//!
//! let filter = Predicate::equals("host", "server-01");
//! let mut search = SeriesSearch::new(1, index, Some(filter), TimeRange::default());
//! search.search();
//!
//! let result = search.result_set().unwrap();
//! assert_eq!(result.cardinality(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod query;
pub mod types;

// Re-export main types
pub use error::{Error, IndexError, Result};
pub use index::{MemoryIndex, MemoryIndexConfig, SeriesIdSet, SeriesIndex};
pub use query::{BinaryOp, Predicate, SeriesSearch};
pub use types::{MetricId, SeriesId, TimeRange, Version};
