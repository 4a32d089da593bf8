//! Identifier newtypes for externally owned reference entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! reference_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

reference_id!(
    /// Identifier of a patient in the patient directory.
    PatientId
);
reference_id!(
    /// Identifier of a hospital department.
    DepartmentId
);
reference_id!(
    /// Identifier of a staff member.
    StaffId
);
reference_id!(
    /// Identifier of a ward.
    WardId
);
reference_id!(
    /// Identifier of an intervention type (assessment, physiotherapy, ...).
    InterventionTypeId
);

/// A typed reference to an externally owned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// A patient.
    Patient(PatientId),
    /// A department.
    Department(DepartmentId),
    /// A staff member.
    Staff(StaffId),
    /// A ward.
    Ward(WardId),
    /// An intervention type.
    InterventionType(InterventionTypeId),
}

impl EntityRef {
    /// Returns the entity kind as used in error messages.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Patient(_) => "patient",
            Self::Department(_) => "department",
            Self::Staff(_) => "staff member",
            Self::Ward(_) => "ward",
            Self::InterventionType(_) => "intervention type",
        }
    }

    /// Returns the referenced UUID.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        match self {
            Self::Patient(id) => id.into_inner(),
            Self::Department(id) => id.into_inner(),
            Self::Staff(id) => id.into_inner(),
            Self::Ward(id) => id.into_inner(),
            Self::InterventionType(id) => id.into_inner(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.uuid())
    }
}

impl From<PatientId> for EntityRef {
    fn from(id: PatientId) -> Self {
        Self::Patient(id)
    }
}

impl From<DepartmentId> for EntityRef {
    fn from(id: DepartmentId) -> Self {
        Self::Department(id)
    }
}

impl From<StaffId> for EntityRef {
    fn from(id: StaffId) -> Self {
        Self::Staff(id)
    }
}

impl From<WardId> for EntityRef {
    fn from(id: WardId) -> Self {
        Self::Ward(id)
    }
}

impl From<InterventionTypeId> for EntityRef {
    fn from(id: InterventionTypeId) -> Self {
        Self::InterventionType(id)
    }
}
