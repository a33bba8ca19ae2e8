//! Market participant repository interface

use async_trait::async_trait;

use super::model::{MarketParticipant, MarketParticipantRole};
use crate::domain::DomainResult;

#[async_trait]
pub trait MarketParticipantRepository: Send + Sync {
    /// Find participant by GLN/EIC market id
    async fn find_by_market_id(&self, market_id: &str) -> DomainResult<Option<MarketParticipant>>;

    /// All active participants acting in `role`
    async fn find_active_by_role(&self, role: MarketParticipantRole) -> DomainResult<Vec<MarketParticipant>>;

    /// Insert or replace a participant
    async fn save(&self, participant: MarketParticipant) -> DomainResult<()>;
}
