//! Shared fixtures for in-memory integration tests.

use carepath::directory::{
    DepartmentId, EntityRef, InterventionTypeId, PatientId, StaffId, WardId,
    adapters::memory::InMemoryReferenceDirectory,
};
use carepath::referral::{
    adapters::memory::InMemoryReferralRepository, services::ReferralLifecycleService,
};
use carepath::task::{
    adapters::memory::InMemoryTaskRepository,
    services::{InterventionRequest, InterventionScheduler, TaskOrchestrator},
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;

/// Clock frozen at 09:00 UTC on one day.
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock(DateTime<Utc>);

impl FrozenClock {
    /// Freezes the clock on the given day.
    ///
    /// # Panics
    ///
    /// Panics when the date does not exist.
    #[must_use]
    pub fn on(value: &str) -> Self {
        let day = date(value);
        Self(Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).expect("valid time")))
    }
}

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an ISO calendar date.
///
/// # Panics
///
/// Panics on malformed input.
#[must_use]
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid ISO date")
}

/// Referral service over in-memory stores.
pub type Referrals =
    ReferralLifecycleService<InMemoryReferralRepository, InMemoryReferenceDirectory, FrozenClock>;
/// Task orchestrator over in-memory stores.
pub type Orchestrator = TaskOrchestrator<
    InMemoryTaskRepository,
    InMemoryReferralRepository,
    InMemoryReferenceDirectory,
    FrozenClock,
>;
/// Scheduler over in-memory stores.
pub type Scheduler =
    InterventionScheduler<InMemoryTaskRepository, InMemoryReferenceDirectory, FrozenClock>;

/// A hospital with one patient, three departments, two staff members and
/// one ward, all registered as active.
pub struct Hospital {
    pub referrals: Referrals,
    pub orchestrator: Orchestrator,
    pub scheduler: Scheduler,
    pub directory: Arc<InMemoryReferenceDirectory>,
    pub patient: PatientId,
    pub primary_care: DepartmentId,
    pub cardiology: DepartmentId,
    pub neurology: DepartmentId,
    pub nurse: StaffId,
    pub physio: StaffId,
    pub ward: WardId,
    pub therapy: InterventionTypeId,
}

impl Hospital {
    /// Wires every service to shared stores with the clock frozen on `today`.
    ///
    /// # Panics
    ///
    /// Panics when the directory rejects a registration.
    #[must_use]
    pub fn open_on(today: &str) -> Self {
        let clock = Arc::new(FrozenClock::on(today));
        let directory = Arc::new(InMemoryReferenceDirectory::new());
        let referral_store = Arc::new(InMemoryReferralRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let hospital = Self {
            referrals: ReferralLifecycleService::new(
                Arc::clone(&referral_store),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            orchestrator: TaskOrchestrator::new(
                Arc::clone(&tasks),
                referral_store,
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            scheduler: InterventionScheduler::new(tasks, Arc::clone(&directory), clock),
            directory,
            patient: PatientId::new(),
            primary_care: DepartmentId::new(),
            cardiology: DepartmentId::new(),
            neurology: DepartmentId::new(),
            nurse: StaffId::new(),
            physio: StaffId::new(),
            ward: WardId::new(),
            therapy: InterventionTypeId::new(),
        };
        for entity in [
            EntityRef::from(hospital.patient),
            hospital.primary_care.into(),
            hospital.cardiology.into(),
            hospital.neurology.into(),
            hospital.nurse.into(),
            hospital.physio.into(),
            hospital.ward.into(),
            hospital.therapy.into(),
        ] {
            hospital
                .directory
                .register(entity)
                .expect("directory should accept entity");
        }
        hospital
    }

    /// Builds an intervention request on the shared ward.
    #[must_use]
    pub fn booking(&self, staff: StaffId, start: &str, end: &str) -> InterventionRequest {
        InterventionRequest::new(self.therapy, staff, self.ward, date(start), date(end))
    }
}

/// Hospital frozen on 2024-02-06.
#[fixture]
pub fn hospital() -> Hospital {
    Hospital::open_on("2024-02-06")
}
