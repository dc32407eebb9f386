//! Domain primitives, aggregation, and ports.
//!
//! Purpose: define the strongly typed staffing rows read from storage, the
//! calendar types that bucket them into business days, and the coverage
//! fold that turns them into one [`DayCoverage`] per day.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - DateRange / DayBoundary: validated range and day bucketing.
//! - aggregate_coverage: pure fold over the three staffing collections.
//! - CoverageService: driving port implementation over a staffing source.

pub mod calendar;
pub mod coverage;
pub mod coverage_service;
pub mod error;
pub mod ids;
pub mod ports;
pub mod staffing;

pub use self::calendar::{
    DateRange, DayBoundary, DayBoundaryError, DayKey, InvalidRange, MAX_RANGE_DAYS,
    MAX_UTC_OFFSET_MINUTES, RangeField, TimestampWindow,
};
pub use self::coverage::{CoverageStatus, DayCoverage, OfficeCoverage, aggregate_coverage};
pub use self::coverage_service::CoverageService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CompanyId, IdValidationError, OfficeId, ShiftId, UserId};
pub use self::staffing::{
    AvailabilityStatus, AvailabilitySubmission, ShiftAssignment, ShiftStatus,
    StaffingRequirement, UnknownStatus,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use shiftboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such company"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
