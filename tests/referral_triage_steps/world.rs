//! Shared world state for referral triage BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use carepath::directory::{
    DepartmentId, PatientId, StaffId, adapters::memory::InMemoryReferenceDirectory,
};
use carepath::referral::{
    adapters::memory::InMemoryReferralRepository,
    domain::Referral,
    services::{ReferralLifecycleService, ReferralServiceError},
};
use carepath::task::{
    adapters::memory::InMemoryTaskRepository,
    services::{TaskOrchestrator, TaskServiceError, TaskView},
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Referral service used by the BDD world.
pub type TestReferralService =
    ReferralLifecycleService<InMemoryReferralRepository, InMemoryReferenceDirectory, DefaultClock>;
/// Task orchestrator used by the BDD world.
pub type TestOrchestrator = TaskOrchestrator<
    InMemoryTaskRepository,
    InMemoryReferralRepository,
    InMemoryReferenceDirectory,
    DefaultClock,
>;

/// Scenario world for referral triage behaviour tests.
pub struct TriageWorld {
    pub referrals: TestReferralService,
    pub orchestrator: TestOrchestrator,
    pub directory: Arc<InMemoryReferenceDirectory>,
    pub departments: HashMap<String, DepartmentId>,
    pub patient: PatientId,
    pub staff: StaffId,
    pub referral: Option<Referral>,
    pub last_triage_error: Option<ReferralServiceError>,
    pub converted: Vec<TaskView>,
    pub last_conversion_error: Option<TaskServiceError>,
}

impl TriageWorld {
    /// Creates a world with a registered patient and staff member.
    ///
    /// # Panics
    ///
    /// Panics when the directory rejects a registration.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryReferenceDirectory::new());
        let referral_store = Arc::new(InMemoryReferralRepository::new());
        let clock = Arc::new(DefaultClock);
        let patient = PatientId::new();
        let staff = StaffId::new();
        for registration in [directory.register(patient), directory.register(staff)] {
            if let Err(err) = registration {
                panic!("directory rejected registration: {err}");
            }
        }
        Self {
            referrals: ReferralLifecycleService::new(
                Arc::clone(&referral_store),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            orchestrator: TaskOrchestrator::new(
                Arc::new(InMemoryTaskRepository::new()),
                referral_store,
                Arc::clone(&directory),
                clock,
            ),
            directory,
            departments: HashMap::new(),
            patient,
            staff,
            referral: None,
            last_triage_error: None,
            converted: Vec::new(),
            last_conversion_error: None,
        }
    }

    /// Returns the department registered under `name`, registering it on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory rejects the registration.
    pub fn department(&mut self, name: &str) -> Result<DepartmentId, eyre::Report> {
        if let Some(existing) = self.departments.get(name) {
            return Ok(*existing);
        }
        let department = DepartmentId::new();
        self.directory
            .register(department)
            .wrap_err_with(|| format!("register department {name}"))?;
        self.departments.insert(name.to_owned(), department);
        Ok(department)
    }

    /// Returns the referral under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no referral has been created yet.
    pub fn current_referral(&self) -> Result<&Referral, eyre::Report> {
        self.referral
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing referral in scenario world"))
    }
}

impl Default for TriageWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TriageWorld {
    TriageWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
