//! Process-local staffing store.
//!
//! Holds one [`CompanyStaffing`] snapshot per company and answers the
//! [`StaffingSource`] reads by filtering it to the requested window. Home
//! offices are resolved when availability is read, so moving a user between
//! offices changes where their past submissions are counted. A store can be
//! filled from a JSON seed file (see [`seed`]).

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;

pub mod seed;

pub use seed::{CompanySeed, HomeOfficeSeed, SeedError, StaffingSeed};

use crate::domain::ports::{StaffingSource, StaffingSourceError};
use crate::domain::{
    AvailabilitySubmission, CompanyId, OfficeId, ShiftAssignment, ShiftId, ShiftStatus,
    StaffingRequirement, TimestampWindow, UserId,
};

/// Staffing rows belonging to one company.
#[derive(Debug, Clone, Default)]
pub struct CompanyStaffing {
    requirements: Vec<StaffingRequirement>,
    shifts: Vec<ShiftAssignment>,
    availability: Vec<AvailabilitySubmission>,
    home_offices: HashMap<UserId, OfficeId>,
}

impl CompanyStaffing {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a staffing requirement.
    pub fn with_requirement(mut self, requirement: StaffingRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Add a shift assignment.
    pub fn with_shift(mut self, shift: ShiftAssignment) -> Self {
        self.shifts.push(shift);
        self
    }

    /// Add an availability submission. Any `home_office_id` on the row is
    /// replaced by the user's home office at read time.
    pub fn with_availability(mut self, submission: AvailabilitySubmission) -> Self {
        self.availability.push(submission);
        self
    }

    /// Assign `user_id` to a home office.
    pub fn with_home_office(mut self, user_id: UserId, office_id: OfficeId) -> Self {
        self.home_offices.insert(user_id, office_id);
        self
    }

    /// Move `user_id` to another home office, or clear it with `None`.
    pub fn set_home_office(&mut self, user_id: UserId, office_id: Option<OfficeId>) {
        match office_id {
            Some(office_id) => self.home_offices.insert(user_id, office_id),
            None => self.home_offices.remove(&user_id),
        };
    }

    /// Change the status of the shift with `id`. Returns whether it exists.
    pub fn set_shift_status(&mut self, id: ShiftId, status: ShiftStatus) -> bool {
        self.shifts
            .iter_mut()
            .find(|shift| shift.id == id)
            .map(|shift| shift.status = status)
            .is_some()
    }
}

/// In-memory [`StaffingSource`].
///
/// # Examples
/// ```
/// use shiftboard::domain::CompanyId;
/// use shiftboard::outbound::memory::{CompanyStaffing, InMemoryStaffingSource};
///
/// let company = CompanyId::random();
/// let source = InMemoryStaffingSource::new().with_company(company, CompanyStaffing::new());
/// assert!(source.has_company(&company));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStaffingSource {
    companies: RwLock<HashMap<CompanyId, CompanyStaffing>>,
}

impl InMemoryStaffingSource {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `company_id` with `staffing`, replacing any previous snapshot.
    pub fn with_company(self, company_id: CompanyId, staffing: CompanyStaffing) -> Self {
        self.replace_company(company_id, staffing);
        self
    }

    /// Replace the snapshot for `company_id`.
    pub fn replace_company(&self, company_id: CompanyId, staffing: CompanyStaffing) {
        let mut companies = self
            .companies
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        companies.insert(company_id, staffing);
    }

    /// Apply `edit` to the snapshot for `company_id`, creating it if absent.
    pub fn update_company<R>(
        &self,
        company_id: CompanyId,
        edit: impl FnOnce(&mut CompanyStaffing) -> R,
    ) -> R {
        let mut companies = self
            .companies
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        edit(companies.entry(company_id).or_default())
    }

    /// Whether a snapshot exists for `company_id`.
    pub fn has_company(&self, company_id: &CompanyId) -> bool {
        self.companies
            .read()
            .map(|companies| companies.contains_key(company_id))
            .unwrap_or(false)
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<CompanyId, CompanyStaffing>>, StaffingSourceError>
    {
        self.companies
            .read()
            .map_err(|_| StaffingSourceError::connection("in-memory staffing store is poisoned"))
    }

    fn select<T: Clone>(
        &self,
        company_id: &CompanyId,
        rows: impl Fn(&CompanyStaffing) -> &[T],
        keep: impl Fn(&T) -> bool,
    ) -> Result<Vec<T>, StaffingSourceError> {
        let companies = self.read()?;
        Ok(companies
            .get(company_id)
            .map(|staffing| rows(staffing).iter().filter(|row| keep(row)).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl StaffingSource for InMemoryStaffingSource {
    async fn fetch_requirements(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<StaffingRequirement>, StaffingSourceError> {
        self.select(
            company_id,
            |staffing| staffing.requirements.as_slice(),
            |row| window.contains(&row.date),
        )
    }

    async fn fetch_shifts(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<ShiftAssignment>, StaffingSourceError> {
        self.select(
            company_id,
            |staffing| staffing.shifts.as_slice(),
            |row| window.contains(&row.date),
        )
    }

    async fn fetch_availability(
        &self,
        company_id: &CompanyId,
        window: &TimestampWindow,
    ) -> Result<Vec<AvailabilitySubmission>, StaffingSourceError> {
        let companies = self.read()?;
        let Some(staffing) = companies.get(company_id) else {
            return Ok(Vec::new());
        };
        Ok(staffing
            .availability
            .iter()
            .filter(|row| window.contains(&row.date))
            .map(|row| AvailabilitySubmission {
                home_office_id: staffing.home_offices.get(&row.user_id).copied(),
                ..row.clone()
            })
            .collect())
    }
}
