//! Series search session and predicate evaluator
//!
//! `SeriesSearch` runs one query's identifier resolution: it walks the
//! predicate tree depth-first, resolves leaves through the index gateway,
//! and combines sub-results bottom-up with set algebra. The first error
//! encountered aborts the walk; sibling branches that already succeeded
//! are discarded and no further gateway calls are made.
//!
//! Negation is complement-based because the index has no native "not
//! equal" primitive: `NOT p` resolves the tag universe for `p`'s key and
//! subtracts `p`'s matches from it.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Error, IndexError, Result};
use crate::index::{SeriesIdSet, SeriesIndex};
use crate::query::predicate::{BinaryOp, Predicate};
use crate::types::{MetricId, TimeRange};

/// One query's identifier-resolution state
///
/// Created per query execution. `search()` is intended to run once;
/// re-invoking it re-executes and overwrites prior state. Not safe for
/// concurrent invocation on the same instance; independent sessions may
/// run concurrently against a shared index.
pub struct SeriesSearch {
    metric_id: MetricId,
    index: Arc<dyn SeriesIndex>,
    filter: Option<Predicate>,
    time_range: TimeRange,
    result: Option<SeriesIdSet>,
    error: Option<Error>,
}

impl SeriesSearch {
    /// Create a search session for one metric, filter, and time range
    ///
    /// `filter` is the root of an already-parsed predicate tree, or
    /// `None` when the query has no filter clause at all.
    pub fn new(
        metric_id: MetricId,
        index: Arc<dyn SeriesIndex>,
        filter: Option<Predicate>,
        time_range: TimeRange,
    ) -> Self {
        Self {
            metric_id,
            index,
            filter,
            time_range,
            result: None,
            error: None,
        }
    }

    /// Resolve the filter to a series identifier set
    ///
    /// With no filter present, both result and error stay unset and the
    /// index is never consulted; the caller must treat all identifiers as
    /// matching. Otherwise the outcome lands in exactly one of
    /// [`result_set`](Self::result_set) or [`error`](Self::error).
    pub fn search(&mut self) {
        self.result = None;
        self.error = None;

        let filter = match &self.filter {
            Some(filter) => filter,
            None => {
                debug!(metric_id = self.metric_id, "search without filter clause");
                return;
            }
        };

        debug!(metric_id = self.metric_id, filter = %filter, "resolving series ids");
        match self.evaluate(filter) {
            Ok(set) => {
                debug!(
                    metric_id = self.metric_id,
                    series = set.cardinality(),
                    versions = set.version_count(),
                    "series resolution complete"
                );
                self.result = Some(set);
            }
            Err(err) => {
                debug!(metric_id = self.metric_id, error = %err, "series resolution failed");
                self.error = Some(err);
            }
        }
    }

    /// The resolved identifier set
    ///
    /// `None` if the last run had no filter, failed, or has not yet run.
    pub fn result_set(&self) -> Option<&SeriesIdSet> {
        self.result.as_ref()
    }

    /// The error that voided the last run, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn evaluate(&self, predicate: &Predicate) -> Result<SeriesIdSet> {
        trace!(node = %predicate, "evaluating predicate node");
        match predicate {
            Predicate::Equals { .. }
            | Predicate::Like { .. }
            | Predicate::Regex { .. }
            | Predicate::In { .. } => {
                self.index
                    .find_series_ids_by_expr(self.metric_id, predicate, self.time_range)
            }

            Predicate::Not(inner) => self.evaluate_not(inner),

            Predicate::Binary { op, left, right } => {
                // Strict left-to-right: a failing left branch means the
                // right branch never touches the gateway.
                let left_set = self.evaluate(left)?;
                let right_set = self.evaluate(right)?;
                Ok(match op {
                    BinaryOp::And => left_set.and(&right_set),
                    BinaryOp::Or => left_set.or(&right_set),
                })
            }
        }
    }

    fn evaluate_not(&self, inner: &Predicate) -> Result<SeriesIdSet> {
        let key = inner.tag_key().ok_or_else(|| {
            IndexError::UnsupportedPredicate(format!(
                "negation only supports a single-key leaf predicate, got: NOT {}",
                inner
            ))
        })?;

        let matched = self
            .index
            .find_series_ids_by_expr(self.metric_id, inner, self.time_range)?;
        let universe = self
            .index
            .series_ids_for_tag(self.metric_id, key, self.time_range)?;
        Ok(universe.and_not(&matched))
    }
}
