//! Inverted index gateway and series identifier sets
//!
//! # Components
//!
//! - **series_set**: version-partitioned roaring bitmap container
//! - **memory**: deterministic in-memory gateway implementation
//!
//! The `SeriesIndex` trait is the narrow seam between the predicate
//! evaluator and whatever stores the postings. Implementations resolve
//! leaf predicates and tag universes; they never see `Not` or `Binary`
//! nodes, which the evaluator decomposes itself.

pub mod memory;
pub mod series_set;

pub use memory::{MemoryIndex, MemoryIndexConfig};
pub use series_set::SeriesIdSet;

use crate::error::Result;
use crate::query::Predicate;
use crate::types::{MetricId, TimeRange};

/// Lookup interface into the inverted series index
///
/// Calls are blocking and may perform storage I/O. Neither call is
/// retried by the evaluator; failures propagate immediately and void the
/// enclosing search. Implementations must be safe for concurrent read
/// access so independent search sessions can share one index.
pub trait SeriesIndex: Send + Sync {
    /// Resolve one leaf tag predicate (Equals/Like/Regex/In) to the
    /// matching identifier set within the time range.
    ///
    /// Passing a `Not` or `Binary` node is a contract violation and
    /// yields `IndexError::UnsupportedPredicate`.
    fn find_series_ids_by_expr(
        &self,
        metric_id: MetricId,
        expr: &Predicate,
        time_range: TimeRange,
    ) -> Result<SeriesIdSet>;

    /// Resolve the universal set of series carrying any value for
    /// `tag_key` within the time range.
    ///
    /// Used exclusively to compute the complement for negation; the index
    /// exposes no native "not equal" primitive.
    fn series_ids_for_tag(
        &self,
        metric_id: MetricId,
        tag_key: &str,
        time_range: TimeRange,
    ) -> Result<SeriesIdSet>;
}
