//! Rule identifiers reported back to market participants

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationRuleIdentifier {
    // Document
    SenderIsMandatoryTypeValidation,
    RecipientIsMandatoryTypeValidation,
    DocumentTypeMustBeRequestChangeOfPriceList,
    BusinessReasonCodeMustBeUpdateChargeInformationOrChargePrices,
    CommandSenderMustBeAnExistingMarketParticipant,
    RecipientMustBeMeteringPointAdministrator,

    // Operation input
    ChargeOperationIdRequired,
    ChargeOperationIdLengthValidation,
    ChargeIdRequiredValidation,
    ChargeIdLengthValidation,
    ChargeOwnerIsRequiredValidation,
    ChargeOwnerHasLengthLimits,
    ChargeNameIsRequired,
    ChargeNameHasMaximumLength,
    ChargeDescriptionHasMaximumLength,
    VatClassificationValidation,
    ResolutionTariffValidation,
    ResolutionFeeValidation,
    ResolutionSubscriptionValidation,
    ChargeTypeTariffPriceCount,
    ChargePriceCountForFeeAndSubscription,
    MaximumPrice,
    ChargePriceMaximumDigitsAndDecimals,
    StartDateValidation,
    StartDateMustBeAtLocalMidnight,
    CreateChargeIsNotAllowedATerminationDate,
    StopDateMustMatchEffectiveDate,
    TransparentInvoicingIsNotAllowedForFee,
    TaxIndicatorMustBeFalseForFeeAndSubscription,

    // Operation business
    ChargeOwnerMustMatchSender,
    SenderRoleMayNotManageChargeType,
    ChargeMustExist,
    ChargeAlreadyExists,
    ChargeResolutionCanNotBeUpdated,
    ChangingTariffTaxValueNotAllowed,
    UpdateChargeMustHaveEffectiveDateBeforeStopDate,
    StopDateMustNotPrecedeChargeStart,
    StopMustNotExtendExistingStop,
    CancelStopRequiresStoppedCharge,
    CancelStopMustStartAtStopDate,

    // Synthesized by the orchestrator, never evaluated as rules
    SubsequentBundleOperationsFail,
    TimelineInvariantViolation,
}

impl std::fmt::Display for ValidationRuleIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
