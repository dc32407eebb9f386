//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed staffing reads using Diesel ORM
//! - **memory**: process-local staffing store used when no database is
//!   configured and by integration tests
//!
//! Adapters translate between storage rows and domain types. They contain no
//! aggregation logic.

pub mod memory;
pub mod persistence;
