//! Builders shared by the task unit tests.

use crate::directory::{
    DepartmentId, EntityRef, InterventionTypeId, PatientId, StaffId, WardId,
    adapters::memory::InMemoryReferenceDirectory,
};
use crate::normalization::Priority;
use crate::referral::{
    adapters::memory::InMemoryReferralRepository,
    domain::Referral,
    services::{CreateReferralRequest, ReferralLifecycleService, TriageRequest},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{DateRange, InterventionPlan, Task, TaskClinicalDetails, TaskDraft},
    services::{
        CreateTaskRequest, InterventionRequest, InterventionScheduler, TaskOrchestrator, TaskView,
    },
};
use crate::test_support::{FixedClock, date};
use std::sync::Arc;

pub fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(date(start), date(end)).expect("valid date range")
}

pub fn plan(staff_id: StaffId, start: &str, end: &str) -> InterventionPlan {
    InterventionPlan {
        intervention_type_id: InterventionTypeId::new(),
        staff_id,
        ward_id: WardId::new(),
        period: range(start, end),
    }
}

pub fn draft(start: &str, end: &str) -> TaskDraft {
    TaskDraft {
        patient_id: PatientId::new(),
        department_id: DepartmentId::new(),
        priority: Priority::Medium,
        period: range(start, end),
        details: TaskClinicalDetails::new("stroke", "independent transfers", ""),
        referral_id: None,
        interventions: Vec::new(),
    }
}

pub fn task_with(start: &str, end: &str, plans: Vec<InterventionPlan>) -> Task {
    Task::new(
        TaskDraft {
            interventions: plans,
            ..draft(start, end)
        },
        &FixedClock::default(),
    )
    .expect("interventions fit the task")
}

pub type TestOrchestrator = TaskOrchestrator<
    InMemoryTaskRepository,
    InMemoryReferralRepository,
    InMemoryReferenceDirectory,
    FixedClock,
>;
pub type TestScheduler =
    InterventionScheduler<InMemoryTaskRepository, InMemoryReferenceDirectory, FixedClock>;
pub type TestReferrals =
    ReferralLifecycleService<InMemoryReferralRepository, InMemoryReferenceDirectory, FixedClock>;

/// Services wired to shared in-memory stores with every reference
/// registered. The clock reads 2026-03-02.
pub struct Harness {
    pub orchestrator: TestOrchestrator,
    pub scheduler: TestScheduler,
    pub referrals: TestReferrals,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub directory: Arc<InMemoryReferenceDirectory>,
    pub patient: PatientId,
    pub department: DepartmentId,
    pub staff: StaffId,
    pub ward: WardId,
    pub intervention_type: InterventionTypeId,
}

impl Harness {
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryReferenceDirectory::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let referral_store = Arc::new(InMemoryReferralRepository::new());
        let clock = Arc::new(FixedClock::default());
        let harness = Self {
            orchestrator: TaskOrchestrator::new(
                Arc::clone(&tasks),
                Arc::clone(&referral_store),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            scheduler: InterventionScheduler::new(
                Arc::clone(&tasks),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            referrals: ReferralLifecycleService::new(
                referral_store,
                Arc::clone(&directory),
                clock,
            ),
            tasks,
            directory,
            patient: PatientId::new(),
            department: DepartmentId::new(),
            staff: StaffId::new(),
            ward: WardId::new(),
            intervention_type: InterventionTypeId::new(),
        };
        for entity in [
            EntityRef::from(harness.patient),
            harness.department.into(),
            harness.staff.into(),
            harness.ward.into(),
            harness.intervention_type.into(),
        ] {
            harness.register(entity);
        }
        harness
    }

    pub fn register(&self, entity: impl Into<EntityRef>) {
        self.directory
            .register(entity)
            .expect("directory should accept entity");
    }

    pub fn new_staff(&self) -> StaffId {
        let staff = StaffId::new();
        self.register(staff);
        staff
    }

    pub fn booking(&self, staff: StaffId, start: &str, end: &str) -> InterventionRequest {
        InterventionRequest::new(
            self.intervention_type,
            staff,
            self.ward,
            date(start),
            date(end),
        )
    }

    pub fn task_request(&self, start: &str, end: &str) -> CreateTaskRequest {
        CreateTaskRequest::new(self.patient, self.department, "medium", date(start), date(end))
    }

    pub async fn create_task(&self, start: &str, end: &str) -> TaskView {
        self.orchestrator
            .create_task(self.task_request(start, end))
            .await
            .expect("task creation should succeed")
    }

    pub async fn accepted_referral(&self) -> Referral {
        let origin = DepartmentId::new();
        self.register(origin);
        let created = self
            .referrals
            .create_referral(
                CreateReferralRequest::new(
                    self.patient,
                    origin,
                    self.department,
                    "p2",
                    self.staff,
                )
                .with_clinical("heart failure", "stable weight", "daily fluid balance"),
            )
            .await
            .expect("referral creation should succeed");
        self.referrals
            .triage(TriageRequest::new(created.id(), "accept", self.staff))
            .await
            .expect("accept should succeed")
    }
}
