//! Data prepared for rules before a validation pass

use chrono::{DateTime, Utc};

use crate::domain::charge::Charge;
use crate::domain::document::DocumentParty;
use crate::domain::market_participant::MarketParticipant;

/// Context for document rules
#[derive(Debug, Clone, Default)]
pub struct DocumentValidationContext {
    /// Registered participant matching the document sender, if any
    pub sender: Option<MarketParticipant>,
}

/// Context for operation input rules
#[derive(Debug, Clone)]
pub struct InputValidationContext {
    /// Validation clock
    pub now: DateTime<Utc>,
}

/// Context for operation business rules
#[derive(Debug, Clone)]
pub struct BusinessValidationContext {
    /// Sender as claimed by the document
    pub sender: DocumentParty,
    /// Current state of the operation's charge, including earlier operations
    /// in the same bundle. `None` when the charge does not exist or has no
    /// periods left.
    pub existing_charge: Option<Charge>,
}
