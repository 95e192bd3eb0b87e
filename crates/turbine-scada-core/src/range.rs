//! Date-range filter applied to series queries.
//!
//! Bound semantics follow the dashboard's date picker exactly:
//!
//! - start and end: keep `start < ts <= end`
//! - start only: keep `ts > start`
//! - neither: keep everything
//! - end only: keep everything (the end bound is only honoured together
//!   with a start bound)
//!
//! [`RangeFilter::contains`] is the per-row predicate and
//! [`RangeFilter::clip`] is the equivalent index range over a sorted
//! timestamp buffer. Both go through [`RangeFilter::effective_bounds`] so the
//! rules above live in one place.

use std::ops::Range;

use chrono::NaiveDateTime;
use snafu::prelude::*;

use crate::timestamp::{parse_day_first, parse_iso, to_millis};

/// Errors from parsing a user-supplied range bound.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum ParseBoundError {
    /// The bound matched none of the accepted date or date-time layouts.
    #[snafu(display(
        "invalid date bound '{input}' (expected YYYY-MM-DD, YYYY-MM-DD HH:MM[:SS] or DD/MM/YYYY HH:MM[:SS])"
    ))]
    Unrecognized {
        /// The original input string.
        input: String,
    },
}

/// Optional start/end bounds over the table's time column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeFilter {
    /// Exclusive lower bound.
    pub start: Option<NaiveDateTime>,
    /// Inclusive upper bound; only effective together with `start`.
    pub end: Option<NaiveDateTime>,
}

impl RangeFilter {
    /// A filter that keeps every row.
    pub const ALL: RangeFilter = RangeFilter {
        start: None,
        end: None,
    };

    /// Build a filter from optional bounds.
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Build a filter from raw date-picker strings.
    ///
    /// `None` or an empty/whitespace string means "no bound".
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ParseBoundError> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    /// True when neither bound restricts the rows.
    pub fn is_unbounded(&self) -> bool {
        self.effective_bounds() == (None, None)
    }

    /// The bounds actually applied: `end` is dropped when `start` is absent.
    pub fn effective_bounds(&self) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        match self.start {
            Some(start) => (Some(start), self.end),
            None => (None, None),
        }
    }

    /// Row predicate.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        match self.effective_bounds() {
            (Some(start), Some(end)) => start < ts && ts <= end,
            (Some(start), None) => ts > start,
            _ => true,
        }
    }

    /// Index range of rows kept by this filter, given timestamps in
    /// milliseconds sorted ascending.
    ///
    /// An end bound before the start bound yields an empty range.
    pub fn clip(&self, sorted_millis: &[i64]) -> Range<usize> {
        match self.effective_bounds() {
            (Some(start), end) => {
                let start = to_millis(start);
                let lo = sorted_millis.partition_point(|&t| t <= start);
                let hi = match end {
                    Some(end) => {
                        let end = to_millis(end);
                        sorted_millis.partition_point(|&t| t <= end)
                    }
                    None => sorted_millis.len(),
                };
                lo..hi.max(lo)
            }
            _ => 0..sorted_millis.len(),
        }
    }
}

/// Parse one bound string.
///
/// Accepts date-picker values (`YYYY-MM-DD`, midnight), ISO date-times and the
/// day-first layout used by the table itself.
pub fn parse_bound(raw: Option<&str>) -> Result<Option<NaiveDateTime>, ParseBoundError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    parse_iso(raw)
        .or_else(|| parse_day_first(raw))
        .map(Some)
        .context(UnrecognizedSnafu { input: raw })
}
