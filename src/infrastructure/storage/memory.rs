//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::charge::{Charge, ChargeIdentifier, ChargeRepository};
use crate::domain::market_participant::{
    MarketParticipant, MarketParticipantRepository, MarketParticipantRole,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// In-memory charge store with version-checked updates
#[derive(Default)]
pub struct InMemoryChargeRepository {
    charges: DashMap<ChargeIdentifier, Charge>,
    failing_writes: AtomicUsize,
}

impl InMemoryChargeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail with a transient storage error.
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    fn check_write(&self) -> DomainResult<()> {
        let injected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(DomainError::Storage("injected write failure".to_string()));
        }
        Ok(())
    }

    fn check_version(charge: &Charge, stored: &Charge) -> DomainResult<()> {
        if stored.version() != charge.version() {
            return Err(DomainError::ConcurrencyConflict {
                entity: "Charge",
                key: charge.identifier().to_string(),
                expected: charge.version(),
                actual: stored.version(),
            });
        }
        Ok(())
    }

    fn not_found(identifier: &ChargeIdentifier) -> DomainError {
        DomainError::NotFound {
            entity: "Charge",
            field: "identifier",
            value: identifier.to_string(),
        }
    }
}

#[async_trait]
impl ChargeRepository for InMemoryChargeRepository {
    async fn find_by_identifier(&self, identifier: &ChargeIdentifier) -> DomainResult<Option<Charge>> {
        Ok(self.charges.get(identifier).map(|c| c.clone()))
    }

    async fn add(&self, mut charge: Charge) -> DomainResult<Charge> {
        self.check_write()?;
        let key = charge.identifier().clone();
        if self.charges.contains_key(&key) {
            return Err(DomainError::Conflict(key.to_string()));
        }
        charge.increment_version();
        self.charges.insert(key, charge.clone());
        Ok(charge)
    }

    async fn update(&self, mut charge: Charge) -> DomainResult<Charge> {
        self.check_write()?;
        let key = charge.identifier().clone();
        let mut stored = self
            .charges
            .get_mut(&key)
            .ok_or_else(|| Self::not_found(&key))?;
        Self::check_version(&charge, &stored)?;
        charge.increment_version();
        *stored = charge.clone();
        Ok(charge)
    }

    async fn remove(&self, charge: &Charge) -> DomainResult<()> {
        self.check_write()?;
        let key = charge.identifier();
        let mut conflict = None;
        let removed = self.charges.remove_if(key, |_, stored| {
            conflict = Self::check_version(charge, stored).err();
            conflict.is_none()
        });
        match (removed, conflict) {
            (Some(_), _) => Ok(()),
            (None, Some(err)) => Err(err),
            (None, None) => Err(Self::not_found(key)),
        }
    }
}

/// In-memory market participant registry
#[derive(Default)]
pub struct InMemoryMarketParticipantRepository {
    participants: DashMap<String, MarketParticipant>,
}

impl InMemoryMarketParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketParticipantRepository for InMemoryMarketParticipantRepository {
    async fn find_by_market_id(&self, market_id: &str) -> DomainResult<Option<MarketParticipant>> {
        Ok(self.participants.get(market_id).map(|p| p.clone()))
    }

    async fn find_active_by_role(&self, role: MarketParticipantRole) -> DomainResult<Vec<MarketParticipant>> {
        let mut found: Vec<_> = self
            .participants
            .iter()
            .filter(|p| p.is_active && p.has_role(role))
            .map(|p| p.value().clone())
            .collect();
        found.sort_by(|a, b| a.market_id.cmp(&b.market_id));
        Ok(found)
    }

    async fn save(&self, participant: MarketParticipant) -> DomainResult<()> {
        self.participants
            .insert(participant.market_id.clone(), participant);
        Ok(())
    }
}

/// Both in-memory repositories behind one [`RepositoryProvider`]
#[derive(Clone, Default)]
pub struct InMemoryRepositoryProvider {
    charges: Arc<InMemoryChargeRepository>,
    market_participants: Arc<InMemoryMarketParticipantRepository>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete charge store, for seeding and failure injection.
    pub fn charge_store(&self) -> &InMemoryChargeRepository {
        &self.charges
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn charges(&self) -> &dyn ChargeRepository {
        self.charges.as_ref()
    }

    fn market_participants(&self) -> &dyn MarketParticipantRepository {
        self.market_participants.as_ref()
    }
}

// ── Tests ──────────────────────────────────────────────────────
