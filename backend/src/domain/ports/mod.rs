//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports describe how the domain reads from its adapters; each one
//! exposes a strongly typed error so adapters map their failures into
//! predictable variants. Driving ports are the use-cases inbound adapters
//! call.

mod macros;
pub(crate) use macros::define_port_error;

mod coverage_query;
mod staffing_source;

#[cfg(test)]
pub use coverage_query::MockCoverageQuery;
pub use coverage_query::{
    CoverageError, CoverageQuery, CoverageRequest, CoverageResponse, FixtureCoverageQuery,
};
#[cfg(test)]
pub use staffing_source::MockStaffingSource;
pub use staffing_source::{
    FixtureStaffingSource, StaffingCollection, StaffingSource, StaffingSourceError,
};
