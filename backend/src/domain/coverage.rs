//! Staffing coverage aggregation.
//!
//! Combines staffing requirements, assigned shifts, and availability
//! submissions into one [`DayCoverage`] per business day, with a per-office
//! breakdown and a derived [`CoverageStatus`].
//!
//! The fold is call-scoped: [`aggregate_coverage`] builds a ledger indexed by
//! day offset from the range start, folds the three row sets into it in a
//! fixed order, and classifies each day once when the ledger is finished.
//! Nothing is cached between calls.
//!
//! Folding order matters. Requirements are folded first because they create
//! the per-office buckets; shifts and availability only increment buckets
//! that already exist, while always counting toward the day totals.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    AvailabilitySubmission, DateRange, DayBoundary, DayKey, OfficeId, ShiftAssignment,
    StaffingRequirement,
};

/// Derived staffing state of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    /// No staffing need was declared for the day.
    Inactive,
    /// Assigned headcount meets or exceeds the requirement.
    Fulfilled,
    /// Some, but not enough, staff are assigned.
    Partial,
    /// Nobody is assigned yet, but staff have said they are available.
    Pending,
    /// Nobody is assigned and nobody has said they are available.
    Shortage,
}

impl CoverageStatus {
    /// Classify a day from its totals.
    ///
    /// Evaluated in precedence order: a day with no requirement is
    /// `Inactive` whatever else was recorded for it.
    ///
    /// # Examples
    /// ```
    /// use shiftboard::domain::CoverageStatus;
    ///
    /// assert_eq!(CoverageStatus::classify(5, 5, 0), CoverageStatus::Fulfilled);
    /// assert_eq!(CoverageStatus::classify(5, 4, 0), CoverageStatus::Partial);
    /// assert_eq!(CoverageStatus::classify(0, 3, 1), CoverageStatus::Inactive);
    /// ```
    pub const fn classify(required: u32, assigned: u32, available: u32) -> Self {
        if required == 0 {
            Self::Inactive
        } else if assigned >= required {
            Self::Fulfilled
        } else if assigned > 0 {
            Self::Partial
        } else if available > 0 {
            Self::Pending
        } else {
            Self::Shortage
        }
    }

    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Fulfilled => "fulfilled",
            Self::Partial => "partial",
            Self::Pending => "pending",
            Self::Shortage => "shortage",
        }
    }
}

/// Coverage of one office on one day.
///
/// Only exists where a requirement was declared for the office and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeCoverage {
    /// Headcount the office needs that day.
    pub required: u32,
    /// Counting shifts assigned to the office.
    pub assigned: u32,
    /// Available staff whose home office this is.
    pub available: u32,
    /// Start of the requirement's working window, if declared.
    pub start_time: Option<NaiveTime>,
    /// End of the requirement's working window, if declared.
    pub end_time: Option<NaiveTime>,
}

/// Company-wide coverage of one day.
///
/// `per_office` is ordered by office identifier so that recomputing over
/// unchanged input serialises identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCoverage {
    /// Business day this entry describes.
    pub date: DayKey,
    /// Sum of every office's requirement.
    pub total_required: u32,
    /// Counting shifts across the company, including offices without a
    /// requirement.
    pub total_assigned: u32,
    /// Available submissions across the company.
    pub total_available: u32,
    /// Breakdown for offices with a requirement that day.
    pub per_office: BTreeMap<OfficeId, OfficeCoverage>,
    /// Classification derived from the three totals.
    pub status: CoverageStatus,
}

#[derive(Debug, Default)]
struct DayTally {
    total_required: u32,
    total_assigned: u32,
    total_available: u32,
    per_office: BTreeMap<OfficeId, OfficeCoverage>,
}

/// Call-local accumulator indexed by day offset from the range start.
struct CoverageLedger<'a> {
    range: &'a DateRange,
    boundary: DayBoundary,
    days: Vec<DayTally>,
}

impl<'a> CoverageLedger<'a> {
    fn new(range: &'a DateRange, boundary: DayBoundary) -> Self {
        let days = range.days().map(|_| DayTally::default()).collect();
        Self {
            range,
            boundary,
            days,
        }
    }

    fn tally_for(
        &mut self,
        timestamp: &DateTime<Utc>,
        source: &'static str,
    ) -> Option<&mut DayTally> {
        let day = self.boundary.day_key_of(timestamp);
        let tally = self
            .range
            .offset_of(day)
            .and_then(|offset| self.days.get_mut(offset));
        if tally.is_none() {
            debug!(%day, source, "row outside requested range ignored");
        }
        tally
    }

    fn fold_requirement(&mut self, requirement: &StaffingRequirement) {
        let Some(tally) = self.tally_for(&requirement.date, "requirements") else {
            return;
        };

        let previous = tally.per_office.insert(
            requirement.office_id,
            OfficeCoverage {
                required: requirement.required_count,
                assigned: 0,
                available: 0,
                start_time: requirement.start_time,
                end_time: requirement.end_time,
            },
        );
        if let Some(previous) = previous {
            warn!(
                office_id = %requirement.office_id,
                date = %requirement.date,
                previous = previous.required,
                replacement = requirement.required_count,
                "duplicate staffing requirement for office and day; last row wins"
            );
            tally.total_required = tally.total_required.saturating_sub(previous.required);
        }
        tally.total_required = tally
            .total_required
            .saturating_add(requirement.required_count);
    }

    fn fold_shift(&mut self, shift: &ShiftAssignment) {
        if !shift.status.counts_toward_coverage() {
            return;
        }
        let Some(tally) = self.tally_for(&shift.date, "shifts") else {
            return;
        };
        tally.total_assigned = tally.total_assigned.saturating_add(1);
        if let Some(bucket) = tally.per_office.get_mut(&shift.office_id) {
            bucket.assigned = bucket.assigned.saturating_add(1);
        }
    }

    fn fold_availability(&mut self, submission: &AvailabilitySubmission) {
        if !submission.status.counts_toward_coverage() {
            return;
        }
        let Some(tally) = self.tally_for(&submission.date, "availability") else {
            return;
        };
        tally.total_available = tally.total_available.saturating_add(1);
        if let Some(bucket) = submission
            .home_office_id
            .and_then(|office_id| tally.per_office.get_mut(&office_id))
        {
            bucket.available = bucket.available.saturating_add(1);
        }
    }

    fn finish(self) -> Vec<DayCoverage> {
        let Self { range, days, .. } = self;
        range
            .days()
            .zip(days)
            .map(|(date, tally)| DayCoverage {
                date,
                total_required: tally.total_required,
                total_assigned: tally.total_assigned,
                total_available: tally.total_available,
                status: CoverageStatus::classify(
                    tally.total_required,
                    tally.total_assigned,
                    tally.total_available,
                ),
                per_office: tally.per_office,
            })
            .collect()
    }
}

/// Fold already-fetched rows into one [`DayCoverage`] per day of `range`.
///
/// Every day in the range yields exactly one entry, ascending, even when no
/// row touches it. Rows are assigned to days through `boundary`; rows that
/// land outside the range are ignored. Cancelled shifts, non-`AVAILABLE`
/// submissions, and rows with unrecognised statuses do not count.
///
/// If two requirement rows name the same office and day, the later row
/// replaces the earlier one and the day total is adjusted to match.
pub fn aggregate_coverage(
    range: &DateRange,
    boundary: DayBoundary,
    requirements: &[StaffingRequirement],
    shifts: &[ShiftAssignment],
    availability: &[AvailabilitySubmission],
) -> Vec<DayCoverage> {
    let mut ledger = CoverageLedger::new(range, boundary);
    for requirement in requirements {
        ledger.fold_requirement(requirement);
    }
    for shift in shifts {
        ledger.fold_shift(shift);
    }
    for submission in availability {
        ledger.fold_availability(submission);
    }
    ledger.finish()
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
