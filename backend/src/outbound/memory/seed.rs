//! JSON seed files for the in-memory staffing store.
//!
//! A seed lists companies with their home-office assignments and staffing
//! rows, using the same camelCase field names the rows serialise with:
//!
//! ```json
//! {
//!   "companies": [{
//!     "companyId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!     "homeOffices": [{ "userId": "…", "officeId": "…" }],
//!     "requirements": [{ "officeId": "…", "date": "2024-06-10T00:00:00Z", "requiredCount": 3 }],
//!     "shifts": [],
//!     "availability": []
//!   }]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::{CompanyStaffing, InMemoryStaffingSource};
use crate::domain::{
    AvailabilitySubmission, CompanyId, OfficeId, ShiftAssignment, StaffingRequirement, UserId,
};

/// Errors raised while loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("failed to read staffing seed at {path}: {source}")]
    Read {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid seed document.
    #[error("invalid staffing seed at {path}: {source}")]
    Parse {
        /// Path to the seed file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
}

/// A user's home office.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HomeOfficeSeed {
    /// Staff member.
    pub user_id: UserId,
    /// Office they are based at.
    pub office_id: OfficeId,
}

/// Staffing rows for one company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanySeed {
    /// Tenant the rows belong to.
    pub company_id: CompanyId,
    /// Home office of each staff member.
    #[serde(default)]
    pub home_offices: Vec<HomeOfficeSeed>,
    /// Headcount targets.
    #[serde(default)]
    pub requirements: Vec<StaffingRequirement>,
    /// Shift assignments.
    #[serde(default)]
    pub shifts: Vec<ShiftAssignment>,
    /// Availability submissions.
    #[serde(default)]
    pub availability: Vec<AvailabilitySubmission>,
}

/// Seed document for [`InMemoryStaffingSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StaffingSeed {
    /// Companies to load.
    pub companies: Vec<CompanySeed>,
}

impl StaffingSeed {
    /// Parse a seed document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<CompanySeed> for CompanyStaffing {
    fn from(seed: CompanySeed) -> Self {
        let CompanySeed {
            home_offices,
            requirements,
            shifts,
            availability,
            ..
        } = seed;
        Self {
            requirements,
            shifts,
            availability,
            home_offices: home_offices
                .into_iter()
                .map(|home| (home.user_id, home.office_id))
                .collect(),
        }
    }
}

impl InMemoryStaffingSource {
    /// Build a store holding every company in `seed`.
    ///
    /// A company listed twice keeps its last entry.
    pub fn from_seed(seed: StaffingSeed) -> Self {
        seed.companies
            .into_iter()
            .fold(Self::new(), |store, company| {
                let company_id = company.company_id;
                store.with_company(company_id, company.into())
            })
    }

    /// Read and parse the seed file at `path`.
    pub fn load_seed_file(path: &Path) -> Result<Self, SeedError> {
        let json = fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let seed = StaffingSeed::from_json(&json).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            companies = seed.companies.len(),
            "loaded staffing seed"
        );
        Ok(Self::from_seed(seed))
    }
}
