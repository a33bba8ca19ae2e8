//! Outbound ports: interfaces the application calls on its way out
//!
//! [`EventPublisher`] decouples the bundle orchestrator from whatever
//! delivers outcomes to market participants. The in-process implementation
//! is [`EventBus`](crate::application::events::EventBus).

use async_trait::async_trait;

use crate::domain::document::{ChargeOperation, Document};
use crate::domain::validation::RejectedOperation;
use crate::shared::errors::InfraError;

// ── EventPublisher ─────────────────────────────────────────────

/// Port for announcing the outcome of a processed bundle.
///
/// The orchestrator calls each method at most once per bundle, and only
/// with a non-empty slice.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_accepted(
        &self,
        document: &Document,
        operations: &[ChargeOperation],
    ) -> Result<(), InfraError>;

    async fn publish_rejected(
        &self,
        document: &Document,
        rejected: &[RejectedOperation],
    ) -> Result<(), InfraError>;
}
