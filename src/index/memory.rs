//! In-memory index gateway
//!
//! `MemoryIndex` keeps segment-partitioned tag postings entirely in
//! memory and implements the `SeriesIndex` gateway over them. It serves
//! as the deterministic stand-in for the on-disk index: tests and
//! embedded deployments run the full evaluator against it without any
//! storage subsystem.
//!
//! Per metric and version it stores a `Segment` with a bitmap per
//! (key, value) pair plus a pre-computed per-key universe bitmap, so tag
//! lookups and negation complements are both O(1) map hits followed by
//! bitmap work. Lookups only touch segments whose observed write range
//! overlaps the query range.

use std::collections::HashMap;

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use roaring::RoaringBitmap;
use tracing::trace;

use crate::error::{IndexError, Result};
use crate::index::series_set::SeriesIdSet;
use crate::index::SeriesIndex;
use crate::query::Predicate;
use crate::types::{MetricId, SeriesId, TimeRange, Version};

/// Configuration for the in-memory index
#[derive(Debug, Clone)]
pub struct MemoryIndexConfig {
    /// Maximum regex pattern length (ReDoS protection)
    pub max_regex_pattern_len: usize,

    /// Compiled regex size limit in bytes
    pub regex_size_limit: usize,

    /// Maximum compiled patterns kept in the cache
    pub max_cached_patterns: usize,
}

impl Default for MemoryIndexConfig {
    fn default() -> Self {
        Self {
            max_regex_pattern_len: 256,
            regex_size_limit: 1024 * 1024,
            max_cached_patterns: 1_000,
        }
    }
}

/// Postings for one storage segment of one metric
#[derive(Debug, Default)]
struct Segment {
    /// Observed time range of writes into this segment
    time_range: Option<TimeRange>,

    /// key -> value -> series bitmap
    postings: HashMap<String, HashMap<String, RoaringBitmap>>,

    /// key -> union of all value bitmaps for that key
    key_universe: HashMap<String, RoaringBitmap>,
}

impl Segment {
    fn record(&mut self, series_id: SeriesId, timestamp: i64, tags: &[(&str, &str)]) {
        self.time_range = Some(match self.time_range {
            Some(range) => TimeRange::new_unchecked(
                range.start.min(timestamp),
                range.end.max(timestamp),
            ),
            None => TimeRange::new_unchecked(timestamp, timestamp),
        });

        for (key, value) in tags {
            self.postings
                .entry((*key).to_string())
                .or_default()
                .entry((*value).to_string())
                .or_default()
                .insert(series_id);
            self.key_universe
                .entry((*key).to_string())
                .or_default()
                .insert(series_id);
        }
    }

    fn overlaps(&self, query_range: &TimeRange) -> bool {
        self.time_range
            .map(|range| range.overlaps(query_range))
            .unwrap_or(false)
    }
}

/// Deterministic in-memory implementation of the index gateway
pub struct MemoryIndex {
    config: MemoryIndexConfig,
    metrics: RwLock<HashMap<MetricId, HashMap<Version, Segment>>>,
    regex_cache: RwLock<HashMap<String, Regex>>,
}

impl MemoryIndex {
    /// Create an empty index with default configuration
    pub fn new() -> Self {
        Self::with_config(MemoryIndexConfig::default())
    }

    /// Create an empty index with custom configuration
    pub fn with_config(config: MemoryIndexConfig) -> Self {
        Self {
            config,
            metrics: RwLock::new(HashMap::new()),
            regex_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Register a series write under a metric and storage version
    ///
    /// The segment's observed time range expands to cover `timestamp`;
    /// lookups skip segments whose range does not overlap the query.
    pub fn add_series(
        &self,
        metric_id: MetricId,
        version: Version,
        series_id: SeriesId,
        timestamp: i64,
        tags: &[(&str, &str)],
    ) {
        let mut metrics = self.metrics.write();
        metrics
            .entry(metric_id)
            .or_default()
            .entry(version)
            .or_default()
            .record(series_id, timestamp, tags);
    }

    fn get_or_compile_regex(&self, pattern: &str) -> Result<Regex> {
        {
            let cache = self.regex_cache.read();
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        if pattern.len() > self.config.max_regex_pattern_len {
            return Err(IndexError::QueryError(format!(
                "regex pattern too long: {} chars (max: {})",
                pattern.len(),
                self.config.max_regex_pattern_len
            ))
            .into());
        }

        let regex = RegexBuilder::new(pattern)
            .size_limit(self.config.regex_size_limit)
            .build()
            .map_err(|e| IndexError::QueryError(format!("invalid regex '{}': {}", pattern, e)))?;

        let mut cache = self.regex_cache.write();
        if cache.len() < self.config.max_cached_patterns {
            cache.insert(pattern.to_string(), regex.clone());
        }

        Ok(regex)
    }

    /// Translate a `*` wildcard pattern into an anchored regex
    fn wildcard_regex(&self, pattern: &str) -> Result<Regex> {
        let mut translated = String::with_capacity(pattern.len() + 8);
        translated.push('^');
        let mut parts = pattern.split('*');
        if let Some(first) = parts.next() {
            translated.push_str(&regex::escape(first));
        }
        for part in parts {
            translated.push_str(".*");
            translated.push_str(&regex::escape(part));
        }
        translated.push('$');
        self.get_or_compile_regex(&translated)
    }

    fn matching_values(
        postings: &HashMap<String, RoaringBitmap>,
        matcher: impl Fn(&str) -> bool,
    ) -> RoaringBitmap {
        let mut result = RoaringBitmap::new();
        for (value, bitmap) in postings {
            if matcher(value) {
                result |= bitmap;
            }
        }
        result
    }

    fn resolve_leaf(&self, segment: &Segment, expr: &Predicate) -> Result<RoaringBitmap> {
        let bitmap = match expr {
            Predicate::Equals { key, value } => segment
                .postings
                .get(key)
                .and_then(|values| values.get(value))
                .cloned()
                .unwrap_or_default(),

            Predicate::In { key, values } => match segment.postings.get(key) {
                Some(postings) => {
                    Self::matching_values(postings, |v| values.iter().any(|candidate| candidate == v))
                }
                None => RoaringBitmap::new(),
            },

            Predicate::Like { key, pattern } => {
                let regex = self.wildcard_regex(pattern)?;
                match segment.postings.get(key) {
                    Some(postings) => Self::matching_values(postings, |v| regex.is_match(v)),
                    None => RoaringBitmap::new(),
                }
            }

            Predicate::Regex { key, pattern } => {
                let regex = self.get_or_compile_regex(pattern)?;
                match segment.postings.get(key) {
                    Some(postings) => Self::matching_values(postings, |v| regex.is_match(v)),
                    None => RoaringBitmap::new(),
                }
            }

            Predicate::Not(_) | Predicate::Binary { .. } => {
                return Err(IndexError::UnsupportedPredicate(format!(
                    "gateway resolves leaf predicates only, got: {}",
                    expr
                ))
                .into())
            }
        };
        Ok(bitmap)
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesIndex for MemoryIndex {
    fn find_series_ids_by_expr(
        &self,
        metric_id: MetricId,
        expr: &Predicate,
        time_range: TimeRange,
    ) -> Result<SeriesIdSet> {
        trace!(metric_id, expr = %expr, "memory index expr lookup");
        let metrics = self.metrics.read();
        let mut result = SeriesIdSet::new();

        if let Some(segments) = metrics.get(&metric_id) {
            for (version, segment) in segments {
                if !segment.overlaps(&time_range) {
                    continue;
                }
                let bitmap = self.resolve_leaf(segment, expr)?;
                if !bitmap.is_empty() {
                    result.add(*version, bitmap);
                }
            }
        }

        Ok(result)
    }

    fn series_ids_for_tag(
        &self,
        metric_id: MetricId,
        tag_key: &str,
        time_range: TimeRange,
    ) -> Result<SeriesIdSet> {
        trace!(metric_id, tag_key, "memory index tag universe lookup");
        let metrics = self.metrics.read();
        let mut result = SeriesIdSet::new();

        if let Some(segments) = metrics.get(&metric_id) {
            for (version, segment) in segments {
                if !segment.overlaps(&time_range) {
                    continue;
                }
                if let Some(universe) = segment.key_universe.get(tag_key) {
                    if !universe.is_empty() {
                        result.add(*version, universe.clone());
                    }
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn populated_index() -> MemoryIndex {
        let index = MemoryIndex::new();
        index.add_series(1, 11, 1, 1000, &[("host", "server-01"), ("dc", "us-east")]);
        index.add_series(1, 11, 2, 1100, &[("host", "server-02"), ("dc", "us-east")]);
        index.add_series(1, 11, 3, 1200, &[("host", "database-01"), ("dc", "us-west")]);
        index
    }

    fn ids(set: &SeriesIdSet, version: Version) -> Vec<u32> {
        set.bitmap(version)
            .map(|b| b.iter().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_equals_lookup() {
        let index = populated_index();
        let set = index
            .find_series_ids_by_expr(
                1,
                &Predicate::equals("dc", "us-east"),
                TimeRange::default(),
            )
            .unwrap();
        assert_eq!(ids(&set, 11), vec![1, 2]);
    }

    #[test]
    fn test_equals_missing_key_is_empty() {
        let index = populated_index();
        let set = index
            .find_series_ids_by_expr(1, &Predicate::equals("env", "prod"), TimeRange::default())
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_in_lookup() {
        let index = populated_index();
        let set = index
            .find_series_ids_by_expr(
                1,
                &Predicate::in_values("host", ["server-01", "database-01"]),
                TimeRange::default(),
            )
            .unwrap();
        assert_eq!(ids(&set, 11), vec![1, 3]);
    }

    #[test]
    fn test_like_wildcard() {
        let index = populated_index();
        let set = index
            .find_series_ids_by_expr(1, &Predicate::like("host", "server-*"), TimeRange::default())
            .unwrap();
        assert_eq!(ids(&set, 11), vec![1, 2]);

        // inner wildcard
        let set = index
            .find_series_ids_by_expr(1, &Predicate::like("host", "*base*"), TimeRange::default())
            .unwrap();
        assert_eq!(ids(&set, 11), vec![3]);

        // literal dash must not act as a regex metachar
        let set = index
            .find_series_ids_by_expr(1, &Predicate::like("host", "server-01"), TimeRange::default())
            .unwrap();
        assert_eq!(ids(&set, 11), vec![1]);
    }

    #[test]
    fn test_regex_lookup() {
        let index = populated_index();
        let set = index
            .find_series_ids_by_expr(
                1,
                &Predicate::regex("host", r"^server-\d+$"),
                TimeRange::default(),
            )
            .unwrap();
        assert_eq!(ids(&set, 11), vec![1, 2]);
    }

    #[test]
    fn test_regex_pattern_too_long_rejected() {
        let index = MemoryIndex::with_config(MemoryIndexConfig {
            max_regex_pattern_len: 8,
            ..Default::default()
        });
        index.add_series(1, 11, 1, 1000, &[("host", "a")]);

        let result = index.find_series_ids_by_expr(
            1,
            &Predicate::regex("host", "very-long-pattern"),
            TimeRange::default(),
        );
        assert!(matches!(
            result,
            Err(Error::Index(IndexError::QueryError(_)))
        ));
    }

    #[test]
    fn test_tag_universe() {
        let index = populated_index();
        let set = index
            .series_ids_for_tag(1, "host", TimeRange::default())
            .unwrap();
        assert_eq!(ids(&set, 11), vec![1, 2, 3]);

        let set = index
            .series_ids_for_tag(1, "missing", TimeRange::default())
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_segment_time_filtering() {
        let index = MemoryIndex::new();
        index.add_series(1, 10, 1, 1000, &[("dc", "us-east")]);
        index.add_series(1, 20, 2, 5000, &[("dc", "us-east")]);

        let set = index
            .find_series_ids_by_expr(
                1,
                &Predicate::equals("dc", "us-east"),
                TimeRange::new(0, 2000).unwrap(),
            )
            .unwrap();
        assert_eq!(set.version_count(), 1);
        assert_eq!(ids(&set, 10), vec![1]);
        assert!(set.bitmap(20).is_none());
    }

    #[test]
    fn test_non_leaf_rejected() {
        let index = populated_index();
        let result = index.find_series_ids_by_expr(
            1,
            &Predicate::and(
                Predicate::equals("dc", "us-east"),
                Predicate::equals("dc", "us-west"),
            ),
            TimeRange::default(),
        );
        assert!(matches!(
            result,
            Err(Error::Index(IndexError::UnsupportedPredicate(_)))
        ));
    }

    #[test]
    fn test_unknown_metric_is_empty() {
        let index = populated_index();
        let set = index
            .find_series_ids_by_expr(99, &Predicate::equals("dc", "us-east"), TimeRange::default())
            .unwrap();
        assert!(set.is_empty());
    }
}
