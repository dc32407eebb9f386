//! Staffing coverage HTTP handler.
//!
//! ```text
//! GET /api/v1/companies/{companyId}/coverage?startDate=2024-06-10&endDate=2024-06-16
//! ```

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CoverageRequest, CoverageResponse};
use crate::domain::{DayCoverage, Error, OfficeCoverage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_company_id};

/// Inclusive date range for a coverage query.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CoverageQueryParams {
    /// First day, `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[param(example = "2024-06-10")]
    pub start_date: Option<String>,
    /// Last day, inclusive.
    #[param(example = "2024-06-16")]
    pub end_date: Option<String>,
}

/// Staffing at one office on one day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficeCoverageBody {
    /// Headcount the office needs.
    pub required: u32,
    /// Counting shifts assigned to the office.
    pub assigned: u32,
    /// Available staff based at the office.
    pub available: u32,
    /// Start of the working window, `HH:MM:SS`.
    #[schema(example = "09:00:00")]
    pub start_time: Option<String>,
    /// End of the working window, `HH:MM:SS`.
    #[schema(example = "17:00:00")]
    pub end_time: Option<String>,
}

/// Coverage for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayCoverageBody {
    /// Business day, `YYYY-MM-DD`.
    #[schema(format = "date", example = "2024-06-10")]
    pub date: String,
    /// Sum of office requirements.
    pub total_required: u32,
    /// Counting shifts across the company.
    pub total_assigned: u32,
    /// Available submissions across the company.
    pub total_available: u32,
    /// Keyed by office id; only offices with a requirement that day appear.
    pub per_office: BTreeMap<String, OfficeCoverageBody>,
    /// One of `inactive`, `fulfilled`, `partial`, `pending`, `shortage`.
    #[schema(example = "partial")]
    pub status: String,
}

/// Coverage for every day of the requested range, ascending by date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResponseBody {
    /// One entry per requested day.
    pub days: Vec<DayCoverageBody>,
}

impl From<OfficeCoverage> for OfficeCoverageBody {
    fn from(value: OfficeCoverage) -> Self {
        Self {
            required: value.required,
            assigned: value.assigned,
            available: value.available,
            start_time: value.start_time.map(|time| time.to_string()),
            end_time: value.end_time.map(|time| time.to_string()),
        }
    }
}

impl From<DayCoverage> for DayCoverageBody {
    fn from(value: DayCoverage) -> Self {
        Self {
            date: value.date.to_string(),
            total_required: value.total_required,
            total_assigned: value.total_assigned,
            total_available: value.total_available,
            per_office: value
                .per_office
                .into_iter()
                .map(|(office_id, office)| (office_id.to_string(), office.into()))
                .collect(),
            status: value.status.as_str().to_owned(),
        }
    }
}

impl From<CoverageResponse> for CoverageResponseBody {
    fn from(value: CoverageResponse) -> Self {
        Self {
            days: value.days.into_iter().map(DayCoverageBody::from).collect(),
        }
    }
}

fn parse_request(company_id: &str, params: CoverageQueryParams) -> Result<CoverageRequest, Error> {
    let company_id = parse_company_id(company_id, FieldName::new("companyId"))?;
    Ok(CoverageRequest::parse(
        company_id,
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?)
}

/// Compute staffing coverage for a company over an inclusive date range.
#[utoipa::path(
    get,
    path = "/api/v1/companies/{companyId}/coverage",
    params(
        ("companyId" = uuid::Uuid, Path, description = "Company whose offices are included"),
        CoverageQueryParams
    ),
    responses(
        (status = 200, description = "One entry per day in the range", body = CoverageResponseBody),
        (status = 400, description = "Invalid company id or date range", body = Error),
        (status = 500, description = "A staffing read failed", body = Error),
        (status = 503, description = "The staffing store is unreachable", body = Error)
    ),
    tags = ["coverage"],
    operation_id = "getCoverage"
)]
#[get("/companies/{company_id}/coverage")]
pub async fn get_coverage(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<CoverageQueryParams>,
) -> ApiResult<web::Json<CoverageResponseBody>> {
    let request = parse_request(path.as_str(), query.into_inner())?;
    let response = state.coverage.compute_coverage(request).await?;
    Ok(web::Json(response.into()))
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
