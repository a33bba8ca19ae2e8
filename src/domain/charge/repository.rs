//! Charge repository interface

use async_trait::async_trait;

use super::identifier::ChargeIdentifier;
use super::model::Charge;
use crate::domain::DomainResult;

#[async_trait]
pub trait ChargeRepository: Send + Sync {
    /// Find the charge stored under `identifier`
    async fn find_by_identifier(&self, identifier: &ChargeIdentifier) -> DomainResult<Option<Charge>>;

    /// Store a new charge. Fails with `Conflict` if the identifier is taken.
    async fn add(&self, charge: Charge) -> DomainResult<Charge>;

    /// Replace a stored charge.
    ///
    /// Fails with `ConcurrencyConflict` when `charge.version()` no longer
    /// matches the stored version. Returns the charge with its new version.
    async fn update(&self, charge: Charge) -> DomainResult<Charge>;

    /// Remove a stored charge
    async fn remove(&self, charge: &Charge) -> DomainResult<()>;
}
