//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - **Thin adapters**: [`DieselStaffingSource`] only translates between
//!   Diesel rows and domain types; aggregation stays in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Async pooling**: connections come from a `bb8` pool driven by
//!   `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use shiftboard::domain::DayBoundary;
//! use shiftboard::outbound::persistence::{DbPool, DieselStaffingSource, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shiftboard")).await?;
//! let source = DieselStaffingSource::new(pool, DayBoundary::utc());
//! # let _ = source;
//! # Ok(())
//! # }
//! ```

mod diesel_staffing_source;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_staffing_source::DieselStaffingSource;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
