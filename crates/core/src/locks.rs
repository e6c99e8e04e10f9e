//! Per-entity mutation locks.
//!
//! Every write to an entity's series or forecast goes through an
//! [`EntityGuard`]. Writers of the same entity queue behind one another;
//! writers of different entities run in parallel. Reads take no lock.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::entities::EntityName;

/// One async mutex per entity name, created on first use.
#[derive(Debug, Default)]
pub struct EntityLocks {
    locks: DashMap<EntityName, Arc<Mutex<()>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the entity is free and returns a guard holding its lock.
    pub async fn acquire(&self, entity: &EntityName) -> EntityGuard {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = self
            .locks
            .entry(entity.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        EntityGuard {
            entity: entity.clone(),
            _guard: guard,
        }
    }

    /// Returns a guard only if nobody currently holds the entity.
    pub fn try_acquire(&self, entity: &EntityName) -> Option<EntityGuard> {
        let lock = self
            .locks
            .entry(entity.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.try_lock_owned().ok().map(|guard| EntityGuard {
            entity: entity.clone(),
            _guard: guard,
        })
    }
}

/// Proof that the caller holds the lock of [`entity`](Self::entity).
///
/// Released on drop.
#[derive(Debug)]
pub struct EntityGuard {
    entity: EntityName,
    _guard: OwnedMutexGuard<()>,
}

impl EntityGuard {
    pub fn entity(&self) -> &EntityName {
        &self.entity
    }
}
