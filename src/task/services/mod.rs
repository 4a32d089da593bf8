//! Application services for task orchestration and intervention scheduling.

mod edit;
mod error;
mod orchestrator;
mod references;
mod requests;
mod scheduler;
mod view;

pub use error::{TaskServiceError, TaskServiceResult};
pub use orchestrator::TaskOrchestrator;
pub use requests::{
    CreateTaskRequest, InterventionRequest, UpdateInterventionRequest, UpdateTaskRequest,
};
pub use scheduler::InterventionScheduler;
pub use view::{StaffBooking, TaskView};
