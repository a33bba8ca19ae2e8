//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::charge::ChargeRepository;
use super::market_participant::MarketParticipantRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let charge = repos.charges().find_by_identifier(&id).await?;
///     let sender = repos.market_participants().find_by_market_id("5790000000001").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn charges(&self) -> &dyn ChargeRepository;
    fn market_participants(&self) -> &dyn MarketParticipantRepository;
}
