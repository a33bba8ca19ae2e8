//! Per-charge write serialization

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::charge::ChargeIdentifier;

/// Process-wide registry of one async mutex per charge identifier.
///
/// Cloning shares the registry.
#[derive(Clone, Default)]
pub struct ChargeLocks {
    locks: Arc<DashMap<ChargeIdentifier, Arc<Mutex<()>>>>,
}

/// Held while a bundle owns its charges. Dropping it releases every lock and
/// forgets identifiers nobody else is waiting on.
pub struct ChargeLockGuard {
    guards: Vec<(ChargeIdentifier, OwnedMutexGuard<()>)>,
    locks: Arc<DashMap<ChargeIdentifier, Arc<Mutex<()>>>>,
}

impl Drop for ChargeLockGuard {
    fn drop(&mut self) {
        for (identifier, guard) in self.guards.drain(..) {
            drop(guard);
            // the registry holds the last handle unless another bundle is queued
            self.locks
                .remove_if(&identifier, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}

impl ChargeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every identifier, always in ascending order so two bundles
    /// touching the same charges cannot deadlock.
    pub async fn acquire(&self, identifiers: &[ChargeIdentifier]) -> ChargeLockGuard {
        let mut ordered = identifiers.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for identifier in ordered {
            let lock = self.locks.entry(identifier.clone()).or_default().value().clone();
            guards.push((identifier.clone(), lock.lock_owned().await));
            debug!(charge = %identifier, "Charge lock acquired");
        }
        ChargeLockGuard {
            guards,
            locks: self.locks.clone(),
        }
    }

    /// Number of identifiers currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
