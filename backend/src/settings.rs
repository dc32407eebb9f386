//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `SHIFTBOARD_*` environment variables, configuration
//! files, and command-line flags in the usual OrthoConfig precedence.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DayBoundary, DayBoundaryError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Configuration values for the coverage service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHIFTBOARD")]
pub struct ShiftboardSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Takes precedence over `seed_file`.
    pub database_url: Option<String>,
    /// JSON staffing seed served from memory when no database is configured.
    pub seed_file: Option<PathBuf>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing a fetch.
    pub db_connect_timeout_secs: Option<u64>,
    /// Minutes east of UTC at which business days begin.
    #[ortho_config(default = 0)]
    pub utc_offset_minutes: i32,
    /// Apply pending schema migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

/// Errors raised when configured values cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Rejected input.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The business-day offset is out of range.
    #[error(transparent)]
    DayBoundary(#[from] DayBoundaryError),
    /// Neither a database nor a seed file was configured.
    #[error("no staffing store configured; set SHIFTBOARD_DATABASE_URL or SHIFTBOARD_SEED_FILE")]
    NoStaffingStore,
}

/// Where coverage reads are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffingBackend<'a> {
    /// PostgreSQL at the given connection string.
    Database(&'a str),
    /// In-memory store loaded from the given seed file.
    SeedFile(&'a Path),
}

impl ShiftboardSettings {
    /// The configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Maximum pooled connections, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Pool checkout timeout, defaulting to 30 seconds.
    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_connect_timeout_secs
                .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
        )
    }

    /// The business-day boundary derived from `utc_offset_minutes`.
    pub fn day_boundary(&self) -> Result<DayBoundary, SettingsError> {
        Ok(DayBoundary::from_offset_minutes(self.utc_offset_minutes)?)
    }

    /// The configured staffing store. A database URL wins over a seed file;
    /// configuring neither is an error.
    pub fn staffing_backend(&self) -> Result<StaffingBackend<'_>, SettingsError> {
        match (self.database_url.as_deref(), self.seed_file.as_deref()) {
            (Some(url), _) => Ok(StaffingBackend::Database(url)),
            (None, Some(path)) => Ok(StaffingBackend::SeedFile(path)),
            (None, None) => Err(SettingsError::NoStaffingStore),
        }
    }
}
