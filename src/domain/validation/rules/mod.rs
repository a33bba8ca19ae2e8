//! Rule catalogue and the validators assembled from it

pub mod business;
pub mod document;
pub mod input;

use super::validator::{BusinessValidator, DocumentValidator, InputValidator};
use crate::config::{MarketConfig, ValidationConfig};

pub fn document_validator(market: &MarketConfig) -> DocumentValidator {
    DocumentValidator::new()
        .with_rule(document::SenderIsMandatory)
        .with_rule(document::RecipientIsMandatory)
        .with_rule(document::DocumentTypeMustBeRequestChangeOfPriceList)
        .with_rule(document::BusinessReasonCodeMustBeChargeUpdate)
        .with_rule(document::SenderMustBeExistingMarketParticipant)
        .with_rule(document::RecipientMustBeMeteringPointAdministrator::new(
            &market.metering_point_administrator_id,
        ))
}

pub fn input_validator(limits: &ValidationConfig, market: &MarketConfig) -> InputValidator {
    InputValidator::new()
        .with_rule(input::OperationIdRequired)
        .with_rule(input::OperationIdLength {
            max: limits.max_operation_id_length,
        })
        .with_rule(input::ChargeIdRequired)
        .with_rule(input::ChargeIdLength {
            max: limits.max_charge_id_length,
        })
        .with_rule(input::ChargeOwnerRequired)
        .with_rule(input::ChargeOwnerLength)
        .with_rule(input::ChargeNameRequired)
        .with_rule(input::ChargeNameMaxLength {
            max: limits.max_name_length,
        })
        .with_rule(input::ChargeDescriptionMaxLength {
            max: limits.max_description_length,
        })
        .with_rule(input::VatClassificationKnown)
        .with_rule(input::ResolutionForChargeType::tariff())
        .with_rule(input::ResolutionForChargeType::fee())
        .with_rule(input::ResolutionForChargeType::subscription())
        .with_rule(input::TariffPriceCount)
        .with_rule(input::FeeAndSubscriptionPriceCount)
        .with_rule(input::MaximumPrice {
            max: limits.max_price,
        })
        .with_rule(input::PriceDigitsAndDecimals {
            integer_digits: limits.max_price_integer_digits,
            decimals: limits.max_price_decimals,
        })
        .with_rule(input::StartDateWindow {
            days_in_past: limits.start_date_max_days_in_past,
            days_in_future: limits.start_date_max_days_in_future,
        })
        .with_rule(input::StartDateAtLocalMidnight {
            offset: market.local_offset(),
        })
        .with_rule(input::TerminationDateNotAllowed)
        .with_rule(input::StopDateMatchesEffectiveDate)
        .with_rule(input::TransparentInvoicingNotAllowedForFee)
        .with_rule(input::TaxIndicatorOnlyForTariffs)
}

pub fn business_validator() -> BusinessValidator {
    BusinessValidator::new()
        .with_rule(business::OwnerMatchesSender)
        .with_rule(business::SenderRoleMayManageChargeType)
        .with_rule(business::ChargeMustExist)
        .with_rule(business::ChargeMustNotExist)
        .with_rule(business::ResolutionUnchanged)
        .with_rule(business::TariffTaxIndicatorUnchanged)
        .with_rule(business::UpdateBeforeStopDate)
        .with_rule(business::StopNotBeforeChargeStart)
        .with_rule(business::StopMustNotExtendExistingStop)
        .with_rule(business::CancelStopRequiresStoppedCharge)
        .with_rule(business::CancelStopStartsAtStopDate)
}
