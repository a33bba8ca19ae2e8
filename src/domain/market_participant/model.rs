//! Market participant domain entity

use serde::{Deserialize, Serialize};

use crate::domain::charge::ChargeType;

/// Market role a participant acts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketParticipantRole {
    GridAccessProvider,
    SystemOperator,
    MeteringPointAdministrator,
    EnergySupplier,
    BalanceResponsibleParty,
}

impl MarketParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GridAccessProvider => "GridAccessProvider",
            Self::SystemOperator => "SystemOperator",
            Self::MeteringPointAdministrator => "MeteringPointAdministrator",
            Self::EnergySupplier => "EnergySupplier",
            Self::BalanceResponsibleParty => "BalanceResponsibleParty",
        }
    }

    /// Whether a participant acting in this role may own charges of `charge_type`.
    ///
    /// System operators own tariffs only; grid access providers own every type.
    pub fn may_manage(&self, charge_type: ChargeType) -> bool {
        match self {
            Self::GridAccessProvider => true,
            Self::SystemOperator => charge_type == ChargeType::Tariff,
            _ => false,
        }
    }
}

impl std::fmt::Display for MarketParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParticipant {
    /// GLN or EIC number
    pub market_id: String,
    pub roles: Vec<MarketParticipantRole>,
    pub is_active: bool,
}

impl MarketParticipant {
    pub fn new(market_id: impl Into<String>, roles: Vec<MarketParticipantRole>) -> Self {
        Self {
            market_id: market_id.into(),
            roles,
            is_active: true,
        }
    }

    pub fn has_role(&self, role: MarketParticipantRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_operator_manages_tariffs_only() {
        let role = MarketParticipantRole::SystemOperator;
        assert!(role.may_manage(ChargeType::Tariff));
        assert!(!role.may_manage(ChargeType::Fee));
        assert!(!role.may_manage(ChargeType::Subscription));
    }

    #[test]
    fn grid_access_provider_manages_everything() {
        let role = MarketParticipantRole::GridAccessProvider;
        assert!(role.may_manage(ChargeType::Tariff));
        assert!(role.may_manage(ChargeType::Fee));
        assert!(role.may_manage(ChargeType::Subscription));
    }

    #[test]
    fn energy_supplier_manages_nothing() {
        assert!(!MarketParticipantRole::EnergySupplier.may_manage(ChargeType::Tariff));
    }

    #[test]
    fn new_participant_is_active() {
        let mut p = MarketParticipant::new("5790000000001", vec![MarketParticipantRole::GridAccessProvider]);
        assert!(p.is_active);
        assert!(p.has_role(MarketParticipantRole::GridAccessProvider));
        assert!(!p.has_role(MarketParticipantRole::SystemOperator));
        p.deactivate();
        assert!(!p.is_active);
    }
}
