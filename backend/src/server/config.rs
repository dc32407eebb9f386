//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use shiftboard::domain::DayBoundary;
use shiftboard::outbound::memory::InMemoryStaffingSource;
use shiftboard::outbound::persistence::DbPool;

/// Backing store for coverage reads.
pub enum StaffingStore {
    /// PostgreSQL through a connection pool.
    Postgres(DbPool),
    /// In-memory store loaded from a seed file.
    Seeded(Arc<InMemoryStaffingSource>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) boundary: DayBoundary,
    pub(crate) store: StaffingStore,
}

impl ServerConfig {
    /// Bind to `bind_addr`, read from `store` and bucket rows by `boundary`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, boundary: DayBoundary, store: StaffingStore) -> Self {
        Self {
            bind_addr,
            boundary,
            store,
        }
    }
}
