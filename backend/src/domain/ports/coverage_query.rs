//! Driving port for staffing coverage reads.
//!
//! Inbound adapters (the admin calendar, report exporters) use this port to
//! obtain one [`DayCoverage`] per day of a range without depending on how
//! the underlying rows are stored.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{
    CompanyId, DateRange, DayCoverage, DayKey, Error, InvalidRange, aggregate_coverage,
};

use super::{StaffingCollection, StaffingSourceError};

/// Failures surfaced by [`CoverageQuery::compute_coverage`].
///
/// Either variant aborts the whole call; no partial sequence is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoverageError {
    /// The caller supplied a malformed, inverted, or oversized range.
    #[error("invalid date range: {0}")]
    InvalidRange(#[from] InvalidRange),
    /// One of the three reads failed.
    #[error("failed to fetch {collection}: {source}")]
    DataSource {
        /// The collection whose fetch failed.
        collection: StaffingCollection,
        /// The adapter's error, unmodified.
        #[source]
        source: StaffingSourceError,
    },
}

impl CoverageError {
    /// Wrap an adapter failure with the collection it came from.
    pub fn data_source(collection: StaffingCollection, source: StaffingSourceError) -> Self {
        Self::DataSource { collection, source }
    }
}

impl From<CoverageError> for Error {
    fn from(value: CoverageError) -> Self {
        match value {
            CoverageError::InvalidRange(range) => invalid_range_error(&range),
            CoverageError::DataSource { collection, source } => {
                let details = json!({ "collection": collection.as_str() });
                match source {
                    StaffingSourceError::Connection { message } => Error::service_unavailable(
                        format!("{collection} source unavailable: {message}"),
                    )
                    .with_details(details),
                    StaffingSourceError::Query { message } => {
                        Error::internal(format!("{collection} source error: {message}"))
                            .with_details(details)
                    }
                }
            }
        }
    }
}

fn invalid_range_error(range: &InvalidRange) -> Error {
    let details = match range {
        InvalidRange::Missing { field } => json!({
            "field": field.as_str(),
            "code": "missing_field",
        }),
        InvalidRange::Unparsable { field, value } => json!({
            "field": field.as_str(),
            "value": value,
            "code": "invalid_date",
        }),
        InvalidRange::Inverted { start, end } => json!({
            "startDate": start.to_string(),
            "endDate": end.to_string(),
            "code": "inverted_range",
        }),
        InvalidRange::OutOfBounds { field, day } => json!({
            "field": field.as_str(),
            "value": day.to_string(),
            "code": "date_out_of_range",
        }),
        InvalidRange::TooLong { days, max } => json!({
            "days": days,
            "max": max,
            "code": "range_too_long",
        }),
    };
    Error::invalid_request(range.to_string()).with_details(details)
}

/// Request to compute coverage for one company over an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageRequest {
    /// Company whose offices are included.
    pub company_id: CompanyId,
    /// Inclusive range of business days.
    pub range: DateRange,
}

impl CoverageRequest {
    /// Build a request from validated bounds.
    pub fn new(company_id: CompanyId, start: DayKey, end: DayKey) -> Result<Self, CoverageError> {
        Ok(Self {
            company_id,
            range: DateRange::new(start, end)?,
        })
    }

    /// Build a request from raw, possibly absent bounds.
    ///
    /// # Examples
    /// ```
    /// use shiftboard::domain::CompanyId;
    /// use shiftboard::domain::ports::{CoverageError, CoverageRequest};
    ///
    /// let err = CoverageRequest::parse(CompanyId::random(), Some("2024-06-11"), Some("2024-06-10"))
    ///     .expect_err("inverted range");
    /// assert!(matches!(err, CoverageError::InvalidRange(_)));
    /// ```
    pub fn parse(
        company_id: CompanyId,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, CoverageError> {
        Ok(Self {
            company_id,
            range: DateRange::parse(start, end)?,
        })
    }
}

/// Coverage for every day of the requested range, ascending by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageResponse {
    /// One entry per day of the range.
    pub days: Vec<DayCoverage>,
}

/// Driving port for staffing coverage reads.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), shiftboard::domain::ports::CoverageError> {
/// use shiftboard::domain::CompanyId;
/// use shiftboard::domain::ports::{CoverageQuery, CoverageRequest, FixtureCoverageQuery};
///
/// let request = CoverageRequest::parse(CompanyId::random(), Some("2024-06-10"), Some("2024-06-16"))?;
/// let response = FixtureCoverageQuery.compute_coverage(request).await?;
/// assert_eq!(response.days.len(), 7);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoverageQuery: Send + Sync {
    /// Compute one coverage entry per day of the request's range.
    async fn compute_coverage(
        &self,
        request: CoverageRequest,
    ) -> Result<CoverageResponse, CoverageError>;
}

/// Fixture query reporting every requested day as inactive.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCoverageQuery;

#[async_trait]
impl CoverageQuery for FixtureCoverageQuery {
    async fn compute_coverage(
        &self,
        request: CoverageRequest,
    ) -> Result<CoverageResponse, CoverageError> {
        Ok(CoverageResponse {
            days: aggregate_coverage(&request.range, Default::default(), &[], &[], &[]),
        })
    }
}
