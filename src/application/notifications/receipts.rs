//! Receipts and charge notifications built from bundle outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MarketConfig;
use crate::domain::charge::{ChargeIdentifier, ChargeType, Point, Resolution};
use crate::domain::document::{ChargeOperation, Document, DocumentParty, OperationType};
use crate::domain::market_participant::{MarketParticipant, MarketParticipantRole};
use crate::domain::validation::{RejectedOperation, ValidationRuleContainer, ValidationRuleIdentifier};

/// One rejection reason as reported back to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptReason {
    pub identifier: ValidationRuleIdentifier,
    pub message_parameters: Vec<String>,
    pub triggered_by: Option<String>,
}

impl From<&ValidationRuleContainer> for ReceiptReason {
    fn from(container: &ValidationRuleContainer) -> Self {
        Self {
            identifier: container.identifier(),
            message_parameters: container.message_parameters().to_vec(),
            triggered_by: container.triggered_by().map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NotificationBody {
    Confirmation,
    Rejection {
        reasons: Vec<ReceiptReason>,
    },
    ChargeData {
        operation_type: OperationType,
        resolution: Resolution,
        start_date_time: DateTime<Utc>,
        currency: String,
        points: Vec<Point>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient: DocumentParty,
    pub original_document_id: String,
    pub operation_id: String,
    pub charge: ChargeIdentifier,
    pub created_at: DateTime<Utc>,
    pub body: NotificationBody,
}

impl Notification {
    fn new(recipient: DocumentParty, document: &Document, operation: &ChargeOperation, body: NotificationBody) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recipient,
            original_document_id: document.id.clone(),
            operation_id: operation.id.clone(),
            charge: operation.charge_identifier(),
            created_at: Utc::now(),
            body,
        }
    }
}

/// Turns accepted and rejected operations into recipient-addressed notifications.
#[derive(Debug, Clone)]
pub struct ReceiptFactory {
    currency: String,
}

impl ReceiptFactory {
    pub fn new(market: &MarketConfig) -> Self {
        Self {
            currency: market.currency.clone(),
        }
    }

    /// One confirmation per accepted operation, addressed to the sender.
    pub fn confirmations(&self, document: &Document, operations: &[ChargeOperation]) -> Vec<Notification> {
        operations
            .iter()
            .map(|op| Notification::new(document.sender.clone(), document, op, NotificationBody::Confirmation))
            .collect()
    }

    /// One rejection per rejected operation, addressed to the sender.
    pub fn rejections(&self, document: &Document, rejected: &[RejectedOperation]) -> Vec<Notification> {
        rejected
            .iter()
            .map(|r| {
                let reasons = r.containers.iter().map(ReceiptReason::from).collect();
                Notification::new(
                    document.sender.clone(),
                    document,
                    &r.operation,
                    NotificationBody::Rejection { reasons },
                )
            })
            .collect()
    }

    /// Accepted tax tariffs are forwarded to every other active grid access provider.
    pub fn charge_data(
        &self,
        document: &Document,
        operations: &[ChargeOperation],
        grid_access_providers: &[MarketParticipant],
    ) -> Vec<Notification> {
        let recipients: Vec<_> = grid_access_providers
            .iter()
            .filter(|p| p.is_active && p.market_id != document.sender.market_id)
            .collect();

        operations
            .iter()
            .filter(|op| is_tax_tariff(op))
            .flat_map(|op| {
                recipients.iter().map(move |participant| {
                    Notification::new(
                        DocumentParty::new(&participant.market_id, MarketParticipantRole::GridAccessProvider),
                        document,
                        op,
                        NotificationBody::ChargeData {
                            operation_type: op.operation_type,
                            resolution: op.resolution,
                            start_date_time: op.start_date_time,
                            currency: self.currency.clone(),
                            points: op.points.clone(),
                        },
                    )
                })
            })
            .collect()
    }
}

pub fn is_tax_tariff(operation: &ChargeOperation) -> bool {
    operation.charge_type == ChargeType::Tariff && operation.tax_indicator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{document, grid_access_provider, operation, test_config, SENDER_ID};

    fn factory() -> ReceiptFactory {
        ReceiptFactory::new(&test_config().market)
    }

    #[test]
    fn confirmations_go_to_sender() {
        let ops = vec![
            operation("op-1", OperationType::Create, "T-1"),
            operation("op-2", OperationType::Update, "T-1"),
        ];
        let receipts = factory().confirmations(&document(), &ops);

        assert_eq!(receipts.len(), 2);
        assert!(receipts.iter().all(|n| n.recipient.market_id == SENDER_ID));
        assert_eq!(receipts[1].operation_id, "op-2");
        assert_eq!(receipts[0].body, NotificationBody::Confirmation);
    }

    #[test]
    fn rejections_carry_every_reason_and_trigger() {
        let rejected = vec![RejectedOperation::new(
            operation("op-3", OperationType::Stop, "T-1"),
            vec![ValidationRuleContainer::cascaded("op-3", "op-2")],
        )];
        let receipts = factory().rejections(&document(), &rejected);

        let NotificationBody::Rejection { reasons } = &receipts[0].body else {
            panic!("expected rejection, got {:?}", receipts[0].body);
        };
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].identifier, ValidationRuleIdentifier::SubsequentBundleOperationsFail);
        assert_eq!(reasons[0].triggered_by.as_deref(), Some("op-2"));
    }

    #[test]
    fn charge_data_only_for_tax_tariffs_and_other_providers() {
        let mut tax = operation("op-1", OperationType::Create, "T-1");
        tax.tax_indicator = true;
        let plain = operation("op-2", OperationType::Create, "T-2");

        let other = MarketParticipant::new("5790000000002", vec![MarketParticipantRole::GridAccessProvider]);
        let mut inactive = MarketParticipant::new("5790000000003", vec![MarketParticipantRole::GridAccessProvider]);
        inactive.deactivate();

        let notifications = factory().charge_data(
            &document(),
            &[tax, plain],
            &[grid_access_provider(), other, inactive],
        );

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].recipient.market_id, "5790000000002");
        assert_eq!(notifications[0].operation_id, "op-1");
        match &notifications[0].body {
            NotificationBody::ChargeData { currency, .. } => assert_eq!(currency, "DKK"),
            other => panic!("unexpected body {:?}", other),
        }
    }
}
