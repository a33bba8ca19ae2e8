//! Charge identity

use serde::{Deserialize, Serialize};

/// Kind of charge a market participant can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChargeType {
    Subscription,
    Fee,
    Tariff,
}

impl ChargeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "Subscription",
            Self::Fee => "Fee",
            Self::Tariff => "Tariff",
        }
    }
}

impl std::fmt::Display for ChargeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique key of a charge: (type, owner, sender-provided id).
///
/// Ordering is total so callers can lock several charges in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargeIdentifier {
    pub charge_type: ChargeType,
    pub owner: String,
    pub charge_id: String,
}

impl ChargeIdentifier {
    pub fn new(charge_type: ChargeType, owner: impl Into<String>, charge_id: impl Into<String>) -> Self {
        Self {
            charge_type,
            owner: owner.into(),
            charge_id: charge_id.into(),
        }
    }
}

impl std::fmt::Display for ChargeIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.charge_type, self.owner, self.charge_id)
    }
}
