//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, StaffingStore};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;

use shiftboard::domain::CoverageService;
use shiftboard::domain::ports::CoverageQuery;
use shiftboard::inbound::http::coverage::get_coverage;
use shiftboard::inbound::http::health::{HealthState, live, ready};
use shiftboard::inbound::http::state::HttpState;
use shiftboard::outbound::persistence::DieselStaffingSource;
use shiftboard::{ApiDoc, Trace};

/// Wire the coverage service to the configured staffing store.
fn build_coverage_query(config: &ServerConfig) -> Arc<dyn CoverageQuery> {
    match &config.store {
        StaffingStore::Postgres(pool) => Arc::new(CoverageService::new(
            Arc::new(DieselStaffingSource::new(pool.clone(), config.boundary)),
            config.boundary,
        )),
        StaffingStore::Seeded(source) => Arc::new(CoverageService::new(
            Arc::clone(source),
            config.boundary,
        )),
    }
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").service(get_coverage);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(HttpState::new(build_coverage_query(&config)));
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, offset_seconds = config.boundary.offset_seconds(), "server listening");
    health_state.mark_ready();
    Ok(server)
}
