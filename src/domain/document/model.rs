//! Market documents and the charge operations they carry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::charge::{
    ChargeIdentifier, ChargePeriod, ChargeType, Point, Resolution, VatClassification,
};
use crate::domain::market_participant::MarketParticipantRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    RequestChangeOfPriceList,
    RequestChangeBillingMasterData,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessReasonCode {
    UpdateChargeInformation,
    UpdateChargePrices,
    Unknown,
}

/// Party named in a document header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentParty {
    pub market_id: String,
    pub role: MarketParticipantRole,
}

impl DocumentParty {
    pub fn new(market_id: impl Into<String>, role: MarketParticipantRole) -> Self {
        Self {
            market_id: market_id.into(),
            role,
        }
    }
}

/// Document envelope shared by every operation in a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub document_type: DocumentType,
    pub business_reason_code: BusinessReasonCode,
    pub sender: DocumentParty,
    pub recipient: DocumentParty,
    pub created_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Create,
    Update,
    Stop,
    CancelStop,
}

impl OperationType {
    /// Whether the operation's payload describes a new charge period.
    pub fn carries_period(&self) -> bool {
        !matches!(self, Self::Stop)
    }

    /// Whether the operation acts on a charge that must already exist.
    pub fn requires_existing_charge(&self) -> bool {
        !matches!(self, Self::Create)
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Stop => "Stop",
            Self::CancelStop => "CancelStop",
        };
        write!(f, "{}", s)
    }
}

/// One operation of a bundle.
///
/// For `Stop` the stop date is `start_date_time`; for the other types the
/// payload describes the period to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeOperation {
    pub id: String,
    pub operation_type: OperationType,
    pub charge_id: String,
    pub charge_type: ChargeType,
    pub charge_owner: String,
    pub resolution: Resolution,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vat_classification: VatClassification,
    #[serde(default)]
    pub tax_indicator: bool,
    #[serde(default)]
    pub transparent_invoicing: bool,
    pub start_date_time: DateTime<Utc>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub points: Vec<Point>,
    /// Zero-based index in the bundle, assigned by [`ChargeBundle::new`]
    #[serde(default)]
    pub position: usize,
}

impl ChargeOperation {
    pub fn charge_identifier(&self) -> ChargeIdentifier {
        ChargeIdentifier::new(self.charge_type, &self.charge_owner, &self.charge_id)
    }

    /// Period described by the payload. Without an end date it is open-ended.
    pub fn to_period(&self) -> ChargePeriod {
        let period = ChargePeriod::new(
            &self.name,
            &self.description,
            self.vat_classification,
            self.tax_indicator,
            self.transparent_invoicing,
            self.start_date_time,
        );
        match self.end_date_time {
            Some(end) => period.with_end(end),
            None => period,
        }
    }

    pub fn stop_date(&self) -> DateTime<Utc> {
        self.start_date_time
    }
}

/// A document and its operations in received order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBundle {
    pub document: Document,
    pub operations: Vec<ChargeOperation>,
}

impl ChargeBundle {
    pub fn new(document: Document, operations: Vec<ChargeOperation>) -> Self {
        let mut bundle = Self {
            document,
            operations,
        };
        bundle.normalize_positions();
        bundle
    }

    /// Re-number positions to match the received order.
    pub fn normalize_positions(&mut self) {
        for (position, operation) in self.operations.iter_mut().enumerate() {
            operation.position = position;
        }
    }

    /// Distinct charge identifiers in order of first appearance.
    pub fn charge_identifiers(&self) -> Vec<ChargeIdentifier> {
        let mut seen = std::collections::HashSet::new();
        self.operations
            .iter()
            .map(ChargeOperation::charge_identifier)
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}
