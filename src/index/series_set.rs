//! Version-partitioned series identifier sets
//!
//! A `SeriesIdSet` maps each storage version (time segment) to a roaring
//! bitmap of series IDs recorded under it. All set algebra is pure:
//! operations return new sets and never mutate their operands, so
//! sub-results can be reused or compared across evaluation branches.
//!
//! # Cross-version semantics
//!
//! Series IDs belong to the segment they were written in, so combination
//! across segments follows the segment keys:
//!
//! - `and` keeps only versions present in both operands
//! - `or` is additive across all versions either operand knows about
//! - `and_not` subtracts only where the right side has matching data,
//!   leaving the rest of the left side intact

use std::collections::BTreeMap;

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::types::Version;

/// Series identifiers partitioned by storage version
///
/// Invariants: at most one bitmap per version; a present version's bitmap
/// may be empty but is always materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesIdSet {
    versions: BTreeMap<Version, RoaringBitmap>,
}

impl SeriesIdSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding one bitmap under one version
    pub fn of(version: Version, bitmap: RoaringBitmap) -> Self {
        let mut set = Self::new();
        set.add(version, bitmap);
        set
    }

    /// Merge a bitmap into the set
    ///
    /// If `version` already exists, the stored bitmap becomes the union of
    /// the existing and the new one; otherwise the version is inserted.
    pub fn add(&mut self, version: Version, bitmap: RoaringBitmap) {
        match self.versions.get_mut(&version) {
            Some(existing) => *existing |= bitmap,
            None => {
                self.versions.insert(version, bitmap);
            }
        }
    }

    /// Intersection
    ///
    /// Only versions present in both operands survive; a version absent
    /// from one side contributes nothing.
    pub fn and(&self, other: &SeriesIdSet) -> SeriesIdSet {
        let mut result = SeriesIdSet::new();
        for (version, bitmap) in &self.versions {
            if let Some(other_bitmap) = other.versions.get(version) {
                result.versions.insert(*version, bitmap & other_bitmap);
            }
        }
        result
    }

    /// Union
    ///
    /// The result contains the union of version keys; where both operands
    /// hold a version the bitmaps are OR-ed, otherwise the one present is
    /// copied unchanged.
    pub fn or(&self, other: &SeriesIdSet) -> SeriesIdSet {
        let mut result = self.clone();
        for (version, bitmap) in &other.versions {
            result.add(*version, bitmap.clone());
        }
        result
    }

    /// Asymmetric difference (self AND NOT other)
    ///
    /// The result's version keys are exactly this set's keys; where the
    /// other operand has the same version its bitmap is subtracted,
    /// otherwise the left bitmap passes through unchanged.
    pub fn and_not(&self, other: &SeriesIdSet) -> SeriesIdSet {
        let mut result = SeriesIdSet::new();
        for (version, bitmap) in &self.versions {
            let diff = match other.versions.get(version) {
                Some(other_bitmap) => bitmap - other_bitmap,
                None => bitmap.clone(),
            };
            result.versions.insert(*version, diff);
        }
        result
    }

    /// True iff no version holds a non-empty bitmap
    pub fn is_empty(&self) -> bool {
        self.versions.values().all(|b| b.is_empty())
    }

    /// Total number of series IDs across all versions
    pub fn cardinality(&self) -> u64 {
        self.versions.values().map(|b| b.len()).sum()
    }

    /// Number of versions present (including those with empty bitmaps)
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Get the bitmap stored under a version
    pub fn bitmap(&self, version: Version) -> Option<&RoaringBitmap> {
        self.versions.get(&version)
    }

    /// Iterate over (version, bitmap) pairs in version order
    pub fn iter(&self) -> impl Iterator<Item = (Version, &RoaringBitmap)> {
        self.versions.iter().map(|(v, b)| (*v, b))
    }
}
