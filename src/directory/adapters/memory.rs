//! In-memory reference directory for tests and local development.

use crate::directory::{
    EntityRef,
    ports::{DirectoryError, DirectoryResult, ReferenceDirectory},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory directory keyed by entity reference.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceDirectory {
    entities: Arc<RwLock<HashMap<EntityRef, bool>>>,
}

impl InMemoryReferenceDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an active entity, reactivating it if it was deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn register(&self, entity: impl Into<EntityRef>) -> DirectoryResult<()> {
        self.set_active(entity.into(), true)
    }

    /// Marks an entity inactive without forgetting it.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn deactivate(&self, entity: impl Into<EntityRef>) -> DirectoryResult<()> {
        self.set_active(entity.into(), false)
    }

    fn set_active(&self, entity: EntityRef, active: bool) -> DirectoryResult<()> {
        let mut entities = self.entities.write().map_err(|err| {
            DirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        entities.insert(entity, active);
        Ok(())
    }
}

#[async_trait]
impl ReferenceDirectory for InMemoryReferenceDirectory {
    async fn is_active(&self, entity: EntityRef) -> DirectoryResult<bool> {
        let entities = self.entities.read().map_err(|err| {
            DirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(entities.get(&entity).copied().unwrap_or(false))
    }
}
