//! Query window for occurrence generation.

use chrono::{DateTime, TimeZone};

/// The anchor of a schedule plus the half-open range `[range_start, range_end)`
/// in which occurrences are requested.
///
/// Calendar arithmetic happens in the anchor's time zone; the range bounds
/// are compared as instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceWindow<Tz: TimeZone> {
    /// The schedule's start; no occurrence precedes it.
    pub anchor: DateTime<Tz>,
    /// Inclusive lower bound.
    pub range_start: DateTime<Tz>,
    /// Exclusive upper bound.
    pub range_end: DateTime<Tz>,
}

impl<Tz: TimeZone> OccurrenceWindow<Tz> {
    #[must_use]
    pub fn new(anchor: DateTime<Tz>, range_start: DateTime<Tz>, range_end: DateTime<Tz>) -> Self {
        Self {
            anchor,
            range_start,
            range_end,
        }
    }

    /// Builds a window from epoch milliseconds interpreted in `zone`.
    ///
    /// Returns `None` if any value is outside chrono's representable range.
    #[must_use]
    pub fn from_millis(zone: &Tz, anchor_ms: i64, start_ms: i64, end_ms: i64) -> Option<Self> {
        Some(Self {
            anchor: zone.timestamp_millis_opt(anchor_ms).single()?,
            range_start: zone.timestamp_millis_opt(start_ms).single()?,
            range_end: zone.timestamp_millis_opt(end_ms).single()?,
        })
    }

    /// True if the range cannot contain any instant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range_start >= self.range_end
    }

    /// True if `instant` lies inside `[range_start, range_end)`.
    #[must_use]
    pub fn contains<Tz2: TimeZone>(&self, instant: &DateTime<Tz2>) -> bool {
        self.range_start <= *instant && *instant < self.range_end
    }
}
