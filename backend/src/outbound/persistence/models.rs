//! Internal Diesel row structs for the staffing reads.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{availability_requests, shifts, staffing_requirements};

/// Row read from `staffing_requirements`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staffing_requirements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StaffingRequirementRow {
    pub office_id: Uuid,
    pub work_date: NaiveDate,
    pub required_count: i32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// Row read from `shifts`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shifts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShiftRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub office_id: Uuid,
    pub work_date: DateTime<Utc>,
    pub status: String,
}

/// Row read from `availability_requests`, before the home office join.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = availability_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub user_id: Uuid,
    pub work_date: DateTime<Utc>,
    pub status: String,
}
