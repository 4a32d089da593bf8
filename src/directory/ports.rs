//! Port for active-entity existence checks.

use super::EntityRef;
use crate::error::ErrorKind;
use crate::resilience::Transient;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read-only view over the external reference directories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDirectory: Send + Sync {
    /// Returns whether the entity exists and is active.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the directory cannot be
    /// queried.
    async fn is_active(&self, entity: EntityRef) -> DirectoryResult<bool>;
}

/// Errors returned by directory lookups.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The entity is missing or inactive.
    #[error("{0} not found or inactive")]
    NotFound(EntityRef),

    /// Directory backend failure.
    #[error("directory error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a backend error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns the caller-facing error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::ServiceUnavailable,
        }
    }
}

impl Transient for DirectoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Fails with [`DirectoryError::NotFound`] unless `entity` is active.
///
/// # Errors
///
/// Returns [`DirectoryError::NotFound`] for missing or inactive entities and
/// propagates backend failures.
pub async fn require_active<D>(directory: &D, entity: EntityRef) -> DirectoryResult<()>
where
    D: ReferenceDirectory + ?Sized,
{
    if directory.is_active(entity).await? {
        Ok(())
    } else {
        Err(DirectoryError::NotFound(entity))
    }
}
