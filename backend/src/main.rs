//! Backend entry-point: loads settings, prepares the staffing store, and
//! serves the coverage API.

mod server;

use std::env;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shiftboard::inbound::http::health::HealthState;
use shiftboard::outbound::memory::InMemoryStaffingSource;
use shiftboard::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use shiftboard::settings::{ShiftboardSettings, StaffingBackend};

use server::{ServerConfig, StaffingStore, create_server};

/// Open the configured staffing store, migrating the database first when
/// enabled.
async fn open_staffing_store(settings: &ShiftboardSettings) -> Result<StaffingStore> {
    match settings.staffing_backend()? {
        StaffingBackend::Database(url) => {
            let pool_config = PoolConfig::from_settings(url, settings);
            if settings.run_migrations {
                run_migrations(pool_config.database_url())
                    .await
                    .wrap_err("failed to apply database migrations")?;
            }
            info!(max_connections = pool_config.max_size(), "connecting to database");
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("failed to build database pool")?;
            Ok(StaffingStore::Postgres(pool))
        }
        StaffingBackend::SeedFile(path) => {
            let source = InMemoryStaffingSource::load_seed_file(path)?;
            Ok(StaffingStore::Seeded(Arc::new(source)))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ShiftboardSettings::load_from_iter(env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let boundary = settings.day_boundary()?;
    let store = open_staffing_store(&settings).await?;
    let config = ServerConfig::new(bind_addr, boundary, store);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
