use chrono::{Local, NaiveDate, NaiveTime};

use foundation::time::{day_end, day_start, TimeRange};

/// How the user is expressing the observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeMode {
    /// No filtering; queries run unbounded.
    None,
    /// Whole calendar days, inclusive on both ends.
    DateRange,
    /// Clock times anchored to the current calendar day.
    TimeOfDay,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Maps the mode pickers to a [`TimeRange`].
///
/// Either bound may be left unset. Bounds are passed through as entered;
/// an inverted pair simply produces a window the backend matches nothing
/// against, which mirrors how the pickers behave upstream.
#[derive(Debug)]
pub struct TimeRangeSelector {
    mode: TimeRangeMode,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    today: fn() -> NaiveDate,
    range: TimeRange,
}

impl Default for TimeRangeSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeRangeSelector {
    pub fn new() -> Self {
        Self::with_today(local_today)
    }

    /// Injects the "current day" used to anchor [`TimeRangeMode::TimeOfDay`].
    pub fn with_today(today: fn() -> NaiveDate) -> Self {
        Self {
            mode: TimeRangeMode::None,
            start_date: None,
            end_date: None,
            start_time: None,
            end_time: None,
            today,
            range: TimeRange::none(),
        }
    }

    pub fn mode(&self) -> TimeRangeMode {
        self.mode
    }

    /// The currently selected window. Callers hand this to
    /// `ViewportController::set_time_range`; it takes effect on the next
    /// recenter.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Switching modes discards the previously computed range, then
    /// recomputes from whatever raw values the new mode's fields already
    /// hold. The raw fields themselves persist across switches, so
    /// coming back to a mode restores its earlier selection.
    pub fn set_mode(&mut self, mode: TimeRangeMode) {
        self.mode = mode;
        self.recompute();
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
        self.recompute();
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.end_date = date;
        self.recompute();
    }

    pub fn set_start_time(&mut self, time: Option<NaiveTime>) {
        self.start_time = time;
        self.recompute();
    }

    pub fn set_end_time(&mut self, time: Option<NaiveTime>) {
        self.end_time = time;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.range = match self.mode {
            TimeRangeMode::None => TimeRange::none(),
            TimeRangeMode::DateRange => TimeRange::new(
                self.start_date.map(day_start),
                self.end_date.map(day_end),
            ),
            TimeRangeMode::TimeOfDay => {
                let anchor = (self.today)();
                TimeRange::new(
                    self.start_time.map(|t| anchor.and_time(t)),
                    self.end_time.map(|t| anchor.and_time(t)),
                )
            }
        };
    }
}
