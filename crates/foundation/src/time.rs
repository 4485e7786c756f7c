use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Temporal filter applied to a map data fetch.
///
/// Either bound may be absent; `(None, None)` means no temporal filter.
/// Partial ranges are legal and propagate to the data provider as-is.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    pub fn none() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// First instant of `date`: 00:00:00.000.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(0, 0, 0, 0)
        .expect("midnight is a valid wall-clock time")
}

/// Last representable millisecond of `date`: 23:59:59.999.
///
/// Pinning the end bound here keeps a date-range filter inclusive of the
/// entire selected day.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid wall-clock time")
}
