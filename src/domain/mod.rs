//! Domain layer
//!
//! Charges and their timelines, market participants, inbound documents,
//! validation rules and the events emitted once a bundle is processed.

pub mod charge;
pub mod document;
pub mod events;
pub mod market_participant;
pub mod repositories;
pub mod validation;

pub use charge::{Charge, ChargeIdentifier, ChargePeriod, ChargeType, Resolution, TimelineError};
pub use document::{ChargeBundle, ChargeOperation, Document, OperationType};
pub use market_participant::{MarketParticipant, MarketParticipantRole};
pub use repositories::{DomainResult, RepositoryProvider};

pub use crate::shared::errors::DomainError;
