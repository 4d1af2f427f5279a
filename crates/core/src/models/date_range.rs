use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use super::validation::Validate;

/// Milliseconds in one calendar day.
pub const DAY_MILLIS: i64 = 86_400_000;

/// `date` at 00:00:00.000.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `date` at 23:59:59.999.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date)
        .checked_add_signed(Duration::milliseconds(DAY_MILLIS - 1))
        .unwrap_or(NaiveDateTime::MAX)
}

/// A closed time window `[start, end]` with millisecond resolution.
///
/// Used both for query windows (dashboards, reports) and for budget windows
/// produced by the period strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Build a window, rejecting `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "start ({start}) must not be after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole-day window: `from` 00:00:00.000 through `to` 23:59:59.999.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Result<Self, CoreError> {
        Self::new(start_of_day(from), end_of_day(to))
    }

    /// Overlap predicate: a record spanning `[start, end]` intersects this window.
    /// A record without an end is open-ended.
    pub fn overlaps(&self, start: NaiveDateTime, end: Option<NaiveDateTime>) -> bool {
        start <= self.end && end.map_or(true, |e| e >= self.start)
    }

    /// Whether `instant` falls inside the closed window.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start_date(), self.end_date())
    }
}

/// Date range as it arrives at the API boundary: optional ISO-8601 dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    /// Turn the query into a concrete window.
    ///
    /// With neither bound given, the window is the last `default_days` days
    /// ending on `now`'s date (inclusive). A window reaching before the
    /// earliest representable date is a validation error.
    pub fn resolve(&self, now: NaiveDateTime, default_days: i64) -> Result<DateRange, CoreError> {
        self.validate()?;
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => {
                DateRange::from_dates(parse_iso_date("startDate", start)?, parse_iso_date("endDate", end)?)
            }
            _ => {
                let today = now.date();
                let back = u64::try_from(default_days.max(1) - 1).unwrap_or(0);
                let from = today.checked_sub_days(Days::new(back)).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "a default range of {default_days} days ending {today} is out of range"
                    ))
                })?;
                DateRange::from_dates(from, today)
            }
        }
    }
}

impl Validate for DateRangeQuery {
    fn validate(&self) -> Result<(), CoreError> {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => {
                let from = parse_iso_date("startDate", start)?;
                let to = parse_iso_date("endDate", end)?;
                if from > to {
                    return Err(CoreError::Validation(format!(
                        "startDate ({from}) must not be after endDate ({to})"
                    )));
                }
                Ok(())
            }
            (None, None) => Ok(()),
            _ => Err(CoreError::Validation(
                "startDate and endDate must be provided together".into(),
            )),
        }
    }
}

/// Parse `YYYY-MM-DD`, also accepting a full ISO timestamp (the date part is kept).
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = value.trim();
    let date_part = trimmed
        .split_once(['T', ' '])
        .map_or(trimmed, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!("{field} '{value}' is not a valid ISO-8601 date"))
    })
}
