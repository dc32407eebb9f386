//! Calendar-day keys and inclusive date ranges.
//!
//! Requirements, shifts, and availability are stored as timestamps that may
//! carry a time-of-day component. Coverage is counted per business day, so
//! every timestamp is normalised to a [`DayKey`] through a single
//! [`DayBoundary`] before it is compared with anything else.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Longest range, in days, a single coverage query may span.
pub const MAX_RANGE_DAYS: usize = 366;

/// Largest accepted business-day offset from UTC, in minutes.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

/// Earliest calendar year a range may touch.
pub const MIN_SUPPORTED_YEAR: i32 = 1;

/// Latest calendar year a range may touch.
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

/// Canonical calendar-day key (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wrap a calendar date.
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a key from year, month, and day, returning `None` for
    /// impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Underlying calendar date.
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    fn is_supported(self) -> bool {
        (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&self.0.year())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Error raised when a business-day offset is outside ±18 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("utc offset of {minutes} minutes is outside ±{max} minutes", max = MAX_UTC_OFFSET_MINUTES)]
pub struct DayBoundaryError {
    /// Rejected offset.
    pub minutes: i32,
}

/// The instant at which one business day ends and the next begins.
///
/// Expressed as a fixed offset from UTC so that the same timestamp always
/// lands on the same [`DayKey`] regardless of how it was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayBoundary {
    /// Days begin at midnight UTC.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Days begin at local midnight for the given offset east of UTC.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, DayBoundaryError> {
        if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(DayBoundaryError { minutes });
        }
        FixedOffset::east_opt(minutes * 60)
            .map(|offset| Self { offset })
            .ok_or(DayBoundaryError { minutes })
    }

    /// Offset east of UTC, in seconds.
    pub fn offset_seconds(&self) -> i32 {
        self.offset.local_minus_utc()
    }

    /// Normalise a stored timestamp to its business day.
    pub fn day_key_of(&self, timestamp: &DateTime<Utc>) -> DayKey {
        DayKey(timestamp.with_timezone(&self.offset).date_naive())
    }

    /// The UTC instant at which `day` begins.
    ///
    /// Saturates at the bounds of [`DateTime<Utc>`] for days at the edge of
    /// the representable calendar.
    pub fn start_of(&self, day: DayKey) -> DateTime<Utc> {
        let local_midnight = day.0.and_time(NaiveTime::MIN);
        let offset = TimeDelta::seconds(i64::from(self.offset_seconds()));
        match local_midnight.checked_sub_signed(offset) {
            Some(utc) => DateTime::from_naive_utc_and_offset(utc, Utc),
            None if offset > TimeDelta::zero() => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Half-open timestamp window covering every business day in `range`.
    pub fn window(&self, range: &DateRange) -> TimestampWindow {
        let after_end = range.end.0.succ_opt().unwrap_or(NaiveDate::MAX);
        TimestampWindow {
            start: self.start_of(range.start),
            end: self.start_of(DayKey(after_end)),
        }
    }
}

/// Half-open interval `[start, end)` of UTC instants.
///
/// Adapters use it to select rows; the aggregator never relies on it and
/// re-normalises every timestamp it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampWindow {
    /// First instant included.
    pub start: DateTime<Utc>,
    /// First instant excluded.
    pub end: DateTime<Utc>,
}

impl TimestampWindow {
    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp < self.end
    }
}

/// Query parameter a range error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    /// The first day of the range.
    StartDate,
    /// The last day of the range.
    EndDate,
}

impl RangeField {
    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
        }
    }
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed, inverted, or oversized date range supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRange {
    /// A bound was not supplied.
    #[error("missing required field: {field}")]
    Missing {
        /// The absent bound.
        field: RangeField,
    },
    /// A bound could not be parsed as a date.
    #[error("{field} must be a YYYY-MM-DD date or RFC 3339 timestamp")]
    Unparsable {
        /// The malformed bound.
        field: RangeField,
        /// Raw input.
        value: String,
    },
    /// `start` is after `end`.
    #[error("startDate {start} is after endDate {end}")]
    Inverted {
        /// Requested first day.
        start: DayKey,
        /// Requested last day.
        end: DayKey,
    },
    /// A bound lies outside the supported calendar years.
    #[error("{field} {day} is outside years {min} to {max}", min = MIN_SUPPORTED_YEAR, max = MAX_SUPPORTED_YEAR)]
    OutOfBounds {
        /// The offending bound.
        field: RangeField,
        /// Requested day.
        day: DayKey,
    },
    /// The range spans more days than a single query may cover.
    #[error("range spans {days} days; at most {max} are allowed")]
    TooLong {
        /// Requested span.
        days: usize,
        /// Allowed span.
        max: usize,
    },
}

/// Inclusive range of business days `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DayKey,
    end: DayKey,
}

impl DateRange {
    /// Construct a range, rejecting unsupported years, inverted spans, and
    /// oversized spans.
    pub fn new(start: DayKey, end: DayKey) -> Result<Self, InvalidRange> {
        for (field, day) in [(RangeField::StartDate, start), (RangeField::EndDate, end)] {
            if !day.is_supported() {
                return Err(InvalidRange::OutOfBounds { field, day });
            }
        }
        if start > end {
            return Err(InvalidRange::Inverted { start, end });
        }
        let range = Self { start, end };
        let days = range.len();
        if days > MAX_RANGE_DAYS {
            return Err(InvalidRange::TooLong {
                days,
                max: MAX_RANGE_DAYS,
            });
        }
        Ok(range)
    }

    /// Parse a range from optional raw bounds.
    ///
    /// Accepts `YYYY-MM-DD` dates or RFC 3339 timestamps; a timestamp's
    /// time-of-day is ignored and its date is read in its own offset.
    ///
    /// # Examples
    /// ```
    /// use shiftboard::domain::DateRange;
    ///
    /// let range = DateRange::parse(Some("2024-06-10"), Some("2024-06-12")).expect("valid");
    /// assert_eq!(range.len(), 3);
    /// ```
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, InvalidRange> {
        let start = parse_day(RangeField::StartDate, start)?;
        let end = parse_day(RangeField::EndDate, end)?;
        Self::new(start, end)
    }

    /// First day of the range.
    pub const fn start(&self) -> DayKey {
        self.start
    }

    /// Last day of the range.
    pub const fn end(&self) -> DayKey {
        self.end
    }

    /// Number of days in the range; never zero.
    pub fn len(&self) -> usize {
        let span = self.end.0.signed_duration_since(self.start.0).num_days();
        usize::try_from(span).map_or(0, |days| days + 1)
    }

    /// Ranges always hold at least one day.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether `day` lies within the range.
    pub fn contains(&self, day: DayKey) -> bool {
        self.start <= day && day <= self.end
    }

    /// Position of `day` relative to the start, if inside the range.
    pub fn offset_of(&self, day: DayKey) -> Option<usize> {
        if !self.contains(day) {
            return None;
        }
        usize::try_from(day.0.signed_duration_since(self.start.0).num_days()).ok()
    }

    /// Every day in the range, ascending, without gaps.
    pub fn days(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.start
            .0
            .iter_days()
            .take_while(|date| *date <= self.end.0)
            .map(DayKey)
    }
}

fn parse_day(field: RangeField, raw: Option<&str>) -> Result<DayKey, InvalidRange> {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(InvalidRange::Missing { field })?;

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(DayKey(date));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| DayKey(timestamp.date_naive()))
        .map_err(|_| InvalidRange::Unparsable {
            field,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for day keys and range handling.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::from_ymd(y, m, d).expect("valid test date")
    }

    #[rstest]
    fn range_length_counts_both_ends() {
        let range = DateRange::new(day(2024, 6, 10), day(2024, 6, 16)).expect("valid range");
        assert_eq!(range.len(), 7);
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days.first(), Some(&day(2024, 6, 10)));
        assert_eq!(days.last(), Some(&day(2024, 6, 16)));
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[rstest]
    fn range_crosses_month_and_leap_day() {
        let range = DateRange::new(day(2024, 2, 27), day(2024, 3, 2)).expect("valid range");
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        assert_eq!(
            days,
            ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
    }

    #[rstest]
    fn single_day_range_is_allowed() {
        let range = DateRange::new(day(2024, 6, 10), day(2024, 6, 10)).expect("valid range");
        assert_eq!(range.len(), 1);
        assert_eq!(range.offset_of(day(2024, 6, 10)), Some(0));
        assert_eq!(range.offset_of(day(2024, 6, 11)), None);
    }

    #[rstest]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(day(2024, 6, 11), day(2024, 6, 10)).expect_err("inverted");
        assert!(matches!(err, InvalidRange::Inverted { .. }));
    }

    #[rstest]
    fn oversized_range_is_rejected() {
        let err = DateRange::new(day(2024, 1, 1), day(2025, 1, 1)).expect_err("too long");
        assert_eq!(
            err,
            InvalidRange::TooLong {
                days: 367,
                max: MAX_RANGE_DAYS
            }
        );
    }

    #[rstest]
    #[case(None, Some("2024-06-10"), RangeField::StartDate)]
    #[case(Some("2024-06-10"), None, RangeField::EndDate)]
    #[case(Some("  "), Some("2024-06-10"), RangeField::StartDate)]
    fn parse_reports_missing_bounds(
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
        #[case] field: RangeField,
    ) {
        assert_eq!(
            DateRange::parse(start, end),
            Err(InvalidRange::Missing { field })
        );
    }

    #[rstest]
    fn parse_reports_unparsable_bound() {
        let err = DateRange::parse(Some("2024-06-10"), Some("June 12th")).expect_err("bad end");
        assert!(matches!(
            err,
            InvalidRange::Unparsable {
                field: RangeField::EndDate,
                ..
            }
        ));
    }

    #[rstest]
    fn parse_ignores_time_of_day() {
        let range = DateRange::parse(
            Some("2024-06-10T23:30:00+09:00"),
            Some("2024-06-11T00:15:00Z"),
        )
        .expect("valid range");
        assert_eq!(range.start(), day(2024, 6, 10));
        assert_eq!(range.end(), day(2024, 6, 11));
    }

    #[rstest]
    fn boundary_normalises_timestamps_into_business_day() {
        let tokyo = DayBoundary::from_offset_minutes(9 * 60).expect("valid offset");
        let late_utc = Utc.with_ymd_and_hms(2024, 6, 9, 15, 0, 0).single().expect("valid");
        assert_eq!(tokyo.day_key_of(&late_utc), day(2024, 6, 10));
        assert_eq!(DayBoundary::utc().day_key_of(&late_utc), day(2024, 6, 9));
    }

    #[rstest]
    fn window_spans_whole_business_days() {
        let tokyo = DayBoundary::from_offset_minutes(9 * 60).expect("valid offset");
        let range = DateRange::new(day(2024, 6, 10), day(2024, 6, 11)).expect("valid range");
        let window = tokyo.window(&range);
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2024, 6, 9, 15, 0, 0).single().expect("valid")
        );
        assert_eq!(
            window.end,
            Utc.with_ymd_and_hms(2024, 6, 11, 15, 0, 0).single().expect("valid")
        );
        assert!(!window.contains(&window.end));
    }

    #[rstest]
    #[case(Some("-262143-01-01"), Some("-262143-01-02"), RangeField::StartDate)]
    #[case(Some("0000-12-31"), Some("2024-06-10"), RangeField::StartDate)]
    #[case(Some("2024-06-10"), Some("+10000-01-01"), RangeField::EndDate)]
    fn parse_rejects_years_outside_supported_span(
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
        #[case] expected: RangeField,
    ) {
        let err = DateRange::parse(start, end).expect_err("unsupported year");
        assert!(matches!(
            err,
            InvalidRange::OutOfBounds { field, .. } if field == expected
        ));
    }

    #[rstest]
    fn supported_span_edges_are_accepted() {
        let first = DateRange::new(day(1, 1, 1), day(1, 1, 2)).expect("first supported days");
        let last =
            DateRange::new(day(9999, 12, 30), day(9999, 12, 31)).expect("last supported days");

        let tokyo =
            DayBoundary::from_offset_minutes(MAX_UTC_OFFSET_MINUTES).expect("valid offset");
        let west =
            DayBoundary::from_offset_minutes(-MAX_UTC_OFFSET_MINUTES).expect("valid offset");
        assert!(tokyo.window(&first).start < tokyo.window(&first).end);
        assert!(west.window(&last).start < west.window(&last).end);
    }

    #[rstest]
    fn start_of_saturates_before_the_first_representable_day() {
        let tokyo = DayBoundary::from_offset_minutes(9 * 60).expect("valid offset");
        assert_eq!(
            tokyo.start_of(DayKey::new(NaiveDate::MIN)),
            DateTime::<Utc>::MIN_UTC
        );

        let west = DayBoundary::from_offset_minutes(-9 * 60).expect("valid offset");
        let last = west.start_of(DayKey::new(NaiveDate::MAX));
        assert_eq!(west.day_key_of(&last), DayKey::new(NaiveDate::MAX));
    }

    #[rstest]
    #[case(18 * 60 + 1)]
    #[case(-(18 * 60 + 1))]
    fn boundary_rejects_offsets_beyond_eighteen_hours(#[case] minutes: i32) {
        assert_eq!(
            DayBoundary::from_offset_minutes(minutes),
            Err(DayBoundaryError { minutes })
        );
    }
}
