//! Coverage domain service.
//!
//! Implements the [`CoverageQuery`] driving port by issuing the three
//! staffing reads concurrently and folding their rows with
//! [`aggregate_coverage`]. The service holds no state between calls.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::domain::ports::{
    CoverageError, CoverageQuery, CoverageRequest, CoverageResponse, StaffingCollection,
    StaffingSource, StaffingSourceError,
};
use crate::domain::{DayBoundary, aggregate_coverage};

fn tag_source_error(
    collection: StaffingCollection,
) -> impl FnOnce(StaffingSourceError) -> CoverageError {
    move |source| {
        warn!(
            %collection,
            transient = source.is_transient(),
            error = %source,
            "staffing fetch failed"
        );
        CoverageError::data_source(collection, source)
    }
}

/// Coverage service implementing the query driving port.
#[derive(Clone)]
pub struct CoverageService<S> {
    staffing_source: Arc<S>,
    boundary: DayBoundary,
}

impl<S> CoverageService<S> {
    /// Create a service reading from `staffing_source` and bucketing rows by
    /// `boundary`.
    pub fn new(staffing_source: Arc<S>, boundary: DayBoundary) -> Self {
        Self {
            staffing_source,
            boundary,
        }
    }

    /// The business-day boundary used to normalise timestamps.
    pub fn boundary(&self) -> DayBoundary {
        self.boundary
    }
}

#[async_trait]
impl<S> CoverageQuery for CoverageService<S>
where
    S: StaffingSource,
{
    #[instrument(
        skip(self, request),
        fields(
            company_id = %request.company_id,
            start = %request.range.start(),
            end = %request.range.end(),
        )
    )]
    async fn compute_coverage(
        &self,
        request: CoverageRequest,
    ) -> Result<CoverageResponse, CoverageError> {
        let window = self.boundary.window(&request.range);
        let company_id = &request.company_id;
        let source = self.staffing_source.as_ref();

        let (requirements, shifts, availability) = tokio::try_join!(
            async {
                source
                    .fetch_requirements(company_id, &window)
                    .await
                    .map_err(tag_source_error(StaffingCollection::Requirements))
            },
            async {
                source
                    .fetch_shifts(company_id, &window)
                    .await
                    .map_err(tag_source_error(StaffingCollection::Shifts))
            },
            async {
                source
                    .fetch_availability(company_id, &window)
                    .await
                    .map_err(tag_source_error(StaffingCollection::Availability))
            },
        )?;

        debug!(
            requirements = requirements.len(),
            shifts = shifts.len(),
            availability = availability.len(),
            "folding staffing rows"
        );

        let days = aggregate_coverage(
            &request.range,
            self.boundary,
            &requirements,
            &shifts,
            &availability,
        );
        Ok(CoverageResponse { days })
    }
}

#[cfg(test)]
#[path = "coverage_service_tests.rs"]
mod tests;
