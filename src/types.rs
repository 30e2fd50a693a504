//! Core data types used throughout the series resolver
//!
//! # Key Types
//!
//! - **`MetricId`**: Identifies the metric (table) being queried
//! - **`SeriesId`**: Unique identifier for a time-series within a metric
//! - **`Version`**: Time-storage segment marker under which series IDs were recorded
//! - **`TimeRange`**: Time window for queries (start, end)
//!
//! # Example
//!
//! ```rust
//! use series_search::types::TimeRange;
//!
//! let range = TimeRange::new(1000, 2000).unwrap();
//! assert!(range.contains(1500));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for the metric (table) being queried
pub type MetricId = u32;

/// Unique identifier for a time-series within a metric
///
/// 32-bit so that series membership can be tracked in roaring bitmaps,
/// which hold u32 members.
pub type SeriesId = u32;

/// Time-storage segment marker
///
/// Each bitmap of series IDs belongs to the storage segment (version) it
/// was written under; distinct time ranges may map to distinct versions.
pub type Version = i64;

/// Time range for queries (inclusive on both ends)
///
/// Represents a time window [start, end] for querying time-series data.
///
/// # Example
///
/// ```rust
/// use series_search::types::TimeRange;
///
/// let range = TimeRange::new(1000, 2000).unwrap();
/// assert!(range.contains(1000));
/// assert!(range.contains(2000));
/// assert!(!range.contains(2001));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start timestamp in milliseconds (inclusive)
    pub start: i64,

    /// End timestamp in milliseconds (inclusive)
    pub end: i64,
}

impl TimeRange {
    /// Create a new time range with validation
    ///
    /// Returns an error if start > end.
    pub fn new(start: i64, end: i64) -> Result<Self, crate::error::Error> {
        if start > end {
            return Err(crate::error::Error::Configuration(format!(
                "Invalid time range: start {} > end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a new time range without validation
    ///
    /// Only use this when the inputs are already known to be ordered;
    /// `contains` and `overlaps` may behave unexpectedly if start > end.
    pub fn new_unchecked(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Check if a timestamp falls within this range (inclusive)
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Check if this range overlaps another (inclusive bounds)
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            start: 0,
            end: i64::MAX,
        }
    }
}
