//! References to entities owned by external directories.
//!
//! Patients, departments, staff, wards and intervention types are managed
//! elsewhere. This module only carries their identifiers and the
//! [`ports::ReferenceDirectory`] port used to confirm, at write time, that a
//! referenced entity exists and is active.

pub mod adapters;
mod ids;
pub mod ports;

pub use ids::{DepartmentId, EntityRef, InterventionTypeId, PatientId, StaffId, WardId};
