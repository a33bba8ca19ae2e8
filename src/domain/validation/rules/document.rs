//! Rules over the document envelope

use crate::domain::document::{BusinessReasonCode, Document, DocumentType};
use crate::domain::market_participant::MarketParticipantRole;
use crate::domain::validation::context::DocumentValidationContext;
use crate::domain::validation::identifier::ValidationRuleIdentifier;
use crate::domain::validation::rule::ValidationRule;

type Ctx = DocumentValidationContext;

pub struct SenderIsMandatory;

impl ValidationRule<Document, Ctx> for SenderIsMandatory {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::SenderIsMandatoryTypeValidation
    }

    fn is_valid(&self, document: &Document, _: &Ctx) -> bool {
        !document.sender.market_id.trim().is_empty()
    }
}

pub struct RecipientIsMandatory;

impl ValidationRule<Document, Ctx> for RecipientIsMandatory {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::RecipientIsMandatoryTypeValidation
    }

    fn is_valid(&self, document: &Document, _: &Ctx) -> bool {
        !document.recipient.market_id.trim().is_empty()
    }
}

pub struct DocumentTypeMustBeRequestChangeOfPriceList;

impl ValidationRule<Document, Ctx> for DocumentTypeMustBeRequestChangeOfPriceList {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::DocumentTypeMustBeRequestChangeOfPriceList
    }

    fn is_valid(&self, document: &Document, _: &Ctx) -> bool {
        document.document_type == DocumentType::RequestChangeOfPriceList
    }
}

pub struct BusinessReasonCodeMustBeChargeUpdate;

impl ValidationRule<Document, Ctx> for BusinessReasonCodeMustBeChargeUpdate {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::BusinessReasonCodeMustBeUpdateChargeInformationOrChargePrices
    }

    fn is_valid(&self, document: &Document, _: &Ctx) -> bool {
        matches!(
            document.business_reason_code,
            BusinessReasonCode::UpdateChargeInformation | BusinessReasonCode::UpdateChargePrices
        )
    }
}

/// The sender is registered, active and holds the role it claims.
pub struct SenderMustBeExistingMarketParticipant;

impl ValidationRule<Document, Ctx> for SenderMustBeExistingMarketParticipant {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::CommandSenderMustBeAnExistingMarketParticipant
    }

    fn is_valid(&self, document: &Document, context: &Ctx) -> bool {
        context
            .sender
            .as_ref()
            .is_some_and(|p| p.is_active && p.has_role(document.sender.role))
    }

    fn message_parameters(&self, document: &Document, _: &Ctx) -> Vec<String> {
        vec![
            document.sender.market_id.clone(),
            document.sender.role.to_string(),
        ]
    }
}

pub struct RecipientMustBeMeteringPointAdministrator {
    administrator_id: String,
}

impl RecipientMustBeMeteringPointAdministrator {
    pub fn new(administrator_id: impl Into<String>) -> Self {
        Self {
            administrator_id: administrator_id.into(),
        }
    }
}

impl ValidationRule<Document, Ctx> for RecipientMustBeMeteringPointAdministrator {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::RecipientMustBeMeteringPointAdministrator
    }

    fn is_valid(&self, document: &Document, _: &Ctx) -> bool {
        document.recipient.market_id == self.administrator_id
            && document.recipient.role == MarketParticipantRole::MeteringPointAdministrator
    }

    fn message_parameters(&self, document: &Document, _: &Ctx) -> Vec<String> {
        vec![document.recipient.market_id.clone()]
    }
}
