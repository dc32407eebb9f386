//! Source rows consumed by the coverage aggregator.
//!
//! These are read-only snapshots of records owned elsewhere: admins declare
//! staffing requirements, assign shifts, and staff submit availability.
//! Stored status strings are parsed leniently so that schema drift in the
//! owning system never aborts an aggregation; anything outside the known set
//! becomes `Unrecognised` and does not count.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OfficeId, ShiftId, UserId};

/// Lifecycle state of a shift assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    /// Assigned but not yet acknowledged by the staff member.
    Scheduled,
    /// Acknowledged by the staff member.
    Confirmed,
    /// Worked.
    Completed,
    /// Withdrawn; never counted.
    Cancelled,
    /// Stored value outside the known set; never counted.
    Unrecognised,
}

impl ShiftStatus {
    /// Whether a shift in this state contributes to assigned headcount.
    pub const fn counts_toward_coverage(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed | Self::Completed)
    }

    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Unrecognised => "UNRECOGNISED",
        }
    }

    /// Parse a stored value, mapping unknown values to
    /// [`ShiftStatus::Unrecognised`].
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unrecognised)
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised status value: {value}")]
pub struct UnknownStatus {
    /// Raw stored value.
    pub value: String,
}

impl FromStr for ShiftStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "CONFIRMED" => Ok(Self::Confirmed),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" | "CANCELED" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// A staff member's stated willingness to work on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    /// Willing to work; counted.
    Available,
    /// Not willing to work.
    Unavailable,
    /// Undecided.
    Maybe,
    /// Stored value outside the known set; never counted.
    Unrecognised,
}

impl AvailabilityStatus {
    /// Whether a submission in this state signals available headcount.
    pub const fn counts_toward_coverage(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Unavailable => "UNAVAILABLE",
            Self::Maybe => "MAYBE",
            Self::Unrecognised => "UNRECOGNISED",
        }
    }

    /// Parse a stored value, mapping unknown values to
    /// [`AvailabilityStatus::Unrecognised`].
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unrecognised)
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvailabilityStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "UNAVAILABLE" => Ok(Self::Unavailable),
            "MAYBE" => Ok(Self::Maybe),
            _ => Err(UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Admin-declared headcount target for one office on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingRequirement {
    /// Office the headcount applies to.
    pub office_id: OfficeId,
    /// Any instant inside the business day.
    pub date: DateTime<Utc>,
    /// Staff needed.
    pub required_count: u32,
    /// Start of the working window.
    pub start_time: Option<NaiveTime>,
    /// End of the working window.
    pub end_time: Option<NaiveTime>,
    /// Free-form admin note.
    pub notes: Option<String>,
}

/// A staff member assigned to work at an office on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    /// Shift identifier.
    pub id: ShiftId,
    /// Assigned staff member.
    pub user_id: UserId,
    /// Office the shift is worked at.
    pub office_id: OfficeId,
    /// Any instant inside the business day.
    pub date: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: ShiftStatus,
}

/// A staff member's availability for a day.
///
/// `home_office_id` is the submitting user's home office at query time, not
/// at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySubmission {
    /// Submitting staff member.
    pub user_id: UserId,
    /// Any instant inside the business day.
    pub date: DateTime<Utc>,
    /// Stated availability.
    pub status: AvailabilityStatus,
    /// The user's current home office, if any.
    pub home_office_id: Option<OfficeId>,
}
