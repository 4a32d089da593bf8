//! Numeric code ↔ semantic label mapping for priorities and statuses.
//!
//! Every layer (domain aggregates, persistence adapters, summaries) goes
//! through [`CodedEnum`] so the storage codes live in exactly one place.
//! Unknown codes and labels fail with [`CodeError`] instead of defaulting.

mod codec;
mod error;
mod priority;
mod record_state;
mod status;

pub use codec::CodedEnum;
pub use error::CodeError;
pub use priority::Priority;
pub use record_state::RecordState;
pub use status::{TaskStatus, TriageStatus};
