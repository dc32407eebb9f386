//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the coverage and health endpoints along with the
//! response bodies they return. `GET /api-docs/openapi.json` serves it.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::coverage::{CoverageResponseBody, DayCoverageBody, OfficeCoverageBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shiftboard coverage API",
        description = "Daily staffing coverage per company and office."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::coverage::get_coverage,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CoverageResponseBody,
        DayCoverageBody,
        OfficeCoverageBody,
        Error,
        ErrorCode
    )),
    tags(
        (name = "coverage", description = "Staffing coverage aggregation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
