use chrono::{DateTime, Duration, Utc};

use crate::error::FormatError;

/// How far back a fetch should walk.
///
/// Either an explicit start instant or a span measured back from "now". Both
/// resolve to an absolute cutoff that is compared against message timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Everything created at or after this instant
    Since(DateTime<Utc>),
    /// Everything created within this span before now
    Last(Duration),
}

impl TimeWindow {
    /// Span of `hours` before now; spans too large for a duration saturate.
    pub fn last_hours(hours: i64) -> Self {
        Self::Last(Duration::try_hours(hours).unwrap_or(Duration::MAX))
    }

    /// Span of `days` before now; spans too large for a duration saturate.
    pub fn last_days(days: i64) -> Self {
        Self::Last(Duration::try_days(days).unwrap_or(Duration::MAX))
    }

    /// Span of `hours` before now, as given on the command line.
    ///
    /// # Returns
    /// - `Ok(TimeWindow)` - Window for a non-negative, representable span
    /// - `Err(FormatError::InvalidSpan)` - Negative or out-of-range hour count
    pub fn try_last_hours(hours: i64) -> Result<Self, FormatError> {
        if hours < 0 {
            return Err(FormatError::InvalidSpan { hours });
        }

        Duration::try_hours(hours)
            .map(Self::Last)
            .ok_or(FormatError::InvalidSpan { hours })
    }

    /// Resolves the window into an absolute cutoff instant.
    ///
    /// # Arguments
    /// - `now` - The instant the span is measured back from
    ///
    /// # Returns
    /// - `DateTime<Utc>` - Messages older than this fall outside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Since(start) => *start,
            Self::Last(span) => now
                .checked_sub_signed(*span)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl Default for TimeWindow {
    /// The last 24 hours.
    fn default() -> Self {
        Self::last_hours(24)
    }
}
