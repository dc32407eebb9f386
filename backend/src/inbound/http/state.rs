//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CoverageQuery, FixtureCoverageQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Driving port answering coverage queries.
    pub coverage: Arc<dyn CoverageQuery>,
}

impl HttpState {
    /// Bundle the coverage port for handlers.
    pub fn new(coverage: Arc<dyn CoverageQuery>) -> Self {
        Self { coverage }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureCoverageQuery))
    }
}
