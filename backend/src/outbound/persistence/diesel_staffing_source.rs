//! PostgreSQL-backed `StaffingSource` implementation using Diesel ORM.
//!
//! Requirements and shifts are scoped to a company through their office;
//! availability is scoped through the submitting user, whose current home
//! office is read in the same query.
//!
//! Requirements are stored per business day (`DATE`), so the database
//! enforces one row per office and day. The source converts those days to
//! and from instants with the same [`DayBoundary`] the coverage service
//! uses.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{StaffingSource, StaffingSourceError};
use crate::domain::{
    AvailabilityStatus, AvailabilitySubmission, CompanyId, DayBoundary, DayKey, OfficeId,
    ShiftAssignment, ShiftId, ShiftStatus, StaffingRequirement, TimestampWindow, UserId,
};

use super::models::{AvailabilityRow, ShiftRow, StaffingRequirementRow};
use super::pool::{DbPool, PoolError};
use super::schema::{availability_requests, offices, shifts, staffing_requirements, users};

/// Diesel-backed implementation of the `StaffingSource` port.
#[derive(Clone)]
pub struct DieselStaffingSource {
    pool: DbPool,
    boundary: DayBoundary,
}

impl DieselStaffingSource {
    /// Create a source reading through `pool`. `boundary` must match the
    /// coverage service's.
    pub fn new(pool: DbPool, boundary: DayBoundary) -> Self {
        Self { pool, boundary }
    }
}

fn map_pool_error(error: PoolError) -> StaffingSourceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StaffingSourceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> StaffingSourceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::QueryBuilderError(_) => StaffingSourceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StaffingSourceError::connection("database connection error")
        }
        DieselError::DeserializationError(_) => {
            StaffingSourceError::query("unreadable staffing row")
        }
        _ => StaffingSourceError::query("database error"),
    }
}

fn row_to_requirement(boundary: DayBoundary, row: StaffingRequirementRow) -> StaffingRequirement {
    let required_count = u32::try_from(row.required_count).unwrap_or_else(|_| {
        warn!(
            office_id = %row.office_id,
            work_date = %row.work_date,
            value = row.required_count,
            "negative required_count, treating as zero"
        );
        0
    });

    StaffingRequirement {
        office_id: OfficeId::from_uuid(row.office_id),
        date: boundary.start_of(DayKey::new(row.work_date)),
        required_count,
        start_time: row.start_time,
        end_time: row.end_time,
        notes: row.notes,
    }
}

fn row_to_shift(row: ShiftRow) -> ShiftAssignment {
    let status = ShiftStatus::parse_lenient(&row.status);
    if status == ShiftStatus::Unrecognised {
        warn!(
            shift_id = %row.id,
            value = %row.status,
            "unrecognised shift status, excluding from coverage"
        );
    }

    ShiftAssignment {
        id: ShiftId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        office_id: OfficeId::from_uuid(row.office_id),
        date: row.work_date,
        status,
    }
}

fn row_to_availability(
    (row, home_office_id): (AvailabilityRow, Option<Uuid>),
) -> AvailabilitySubmission {
    let status = AvailabilityStatus::parse_lenient(&row.status);
    if status == AvailabilityStatus::Unrecognised {
        warn!(
            user_id = %row.user_id,
            value = %row.status,
            "unrecognised availability status, excluding from coverage"
        );
    }

    AvailabilitySubmission {
        user_id: UserId::from_uuid(row.user_id),
        date: row.work_date,
        status,
        home_office_id: home_office_id.map(OfficeId::from_uuid),
    }
}

#[async_trait]
impl StaffingSource for DieselStaffingSource {
    async fn fetch_requirements(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<StaffingRequirement>, StaffingSourceError> {
        let first_day = self.boundary.day_key_of(&window.start).date();
        let day_after_last = self.boundary.day_key_of(&window.end).date();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StaffingRequirementRow> = staffing_requirements::table
            .inner_join(offices::table)
            .filter(offices::company_id.eq(company_id.as_uuid()))
            .filter(staffing_requirements::work_date.ge(first_day))
            .filter(staffing_requirements::work_date.lt(day_after_last))
            .order((
                staffing_requirements::work_date.asc(),
                staffing_requirements::office_id.asc(),
            ))
            .select(StaffingRequirementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| row_to_requirement(self.boundary, row))
            .collect())
    }

    async fn fetch_shifts(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<ShiftAssignment>, StaffingSourceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ShiftRow> = shifts::table
            .inner_join(offices::table)
            .filter(offices::company_id.eq(company_id.as_uuid()))
            .filter(shifts::work_date.ge(window.start))
            .filter(shifts::work_date.lt(window.end))
            .order((shifts::work_date.asc(), shifts::id.asc()))
            .select(ShiftRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_shift).collect())
    }

    async fn fetch_availability(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<AvailabilitySubmission>, StaffingSourceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(AvailabilityRow, Option<Uuid>)> = availability_requests::table
            .inner_join(users::table)
            .filter(users::company_id.eq(company_id.as_uuid()))
            .filter(availability_requests::work_date.ge(window.start))
            .filter(availability_requests::work_date.lt(window.end))
            .order((
                availability_requests::work_date.asc(),
                availability_requests::id.asc(),
            ))
            .select((AvailabilityRow::as_select(), users::home_office_id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_availability).collect())
    }
}
