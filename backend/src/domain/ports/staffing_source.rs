//! Port for reading the staffing rows that feed coverage aggregation.
//!
//! Each fetch is scoped to one company and a half-open timestamp window and
//! returns rows that were validated when they were written. Adapters must
//! resolve each availability submitter's current home office.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    AvailabilitySubmission, CompanyId, ShiftAssignment, StaffingRequirement, TimestampWindow,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by staffing source adapters.
    pub enum StaffingSourceError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "staffing source connection failed: {message}",
        /// A read failed during execution.
        Query { message: String } =>
            "staffing source query failed: {message}",
    }
}

impl StaffingSourceError {
    /// Whether the failure is transient and worth retrying with backoff.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// The three collections read by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffingCollection {
    /// Staffing requirements per office and day.
    Requirements,
    /// Shift assignments.
    Shifts,
    /// Availability submissions.
    Availability,
}

impl StaffingCollection {
    /// Stable name used in logs and error details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::Shifts => "shifts",
            Self::Availability => "availability",
        }
    }
}

impl fmt::Display for StaffingCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for the read queries the aggregator depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffingSource: Send + Sync {
    /// Staffing requirements for the company's offices within `window`.
    async fn fetch_requirements(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<StaffingRequirement>, StaffingSourceError>;

    /// Shift assignments at the company's offices within `window`,
    /// including cancelled ones.
    async fn fetch_shifts(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<ShiftAssignment>, StaffingSourceError>;

    /// Availability submitted by the company's staff within `window`, each
    /// joined to the submitter's current home office.
    async fn fetch_availability(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<AvailabilitySubmission>, StaffingSourceError>;
}

/// Fixture implementation for tests that do not exercise staffing reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStaffingSource;

#[async_trait]
impl StaffingSource for FixtureStaffingSource {
    async fn fetch_requirements(
        &self,
        _company_id: &CompanyId,
        _window: &TimestampWindow,
    ) -> Result<Vec<StaffingRequirement>, StaffingSourceError> {
        Ok(Vec::new())
    }

    async fn fetch_shifts(
        &self,
        _company_id: &CompanyId,
        _window: &TimestampWindow,
    ) -> Result<Vec<ShiftAssignment>, StaffingSourceError> {
        Ok(Vec::new())
    }

    async fn fetch_availability(
        &self,
        _company_id: &CompanyId,
        _window: &TimestampWindow,
    ) -> Result<Vec<AvailabilitySubmission>, StaffingSourceError> {
        Ok(Vec::new())
    }
}
