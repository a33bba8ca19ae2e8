//! Rules over an operation and the current state of its charge

use crate::domain::charge::{Charge, ChargeType};
use crate::domain::document::{ChargeOperation, OperationType};
use crate::domain::validation::context::BusinessValidationContext;
use crate::domain::validation::identifier::ValidationRuleIdentifier;
use crate::domain::validation::rule::ValidationRule;

type Ctx = BusinessValidationContext;

fn existing<'a>(op: &ChargeOperation, ctx: &'a Ctx, kinds: &[OperationType]) -> Option<&'a Charge> {
    if kinds.contains(&op.operation_type) {
        ctx.existing_charge.as_ref()
    } else {
        None
    }
}

pub struct OwnerMatchesSender;

impl ValidationRule<ChargeOperation, Ctx> for OwnerMatchesSender {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeOwnerMustMatchSender
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        op.charge_owner == ctx.sender.market_id
    }

    fn message_parameters(&self, op: &ChargeOperation, ctx: &Ctx) -> Vec<String> {
        vec![op.charge_owner.clone(), ctx.sender.market_id.clone()]
    }
}

pub struct SenderRoleMayManageChargeType;

impl ValidationRule<ChargeOperation, Ctx> for SenderRoleMayManageChargeType {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::SenderRoleMayNotManageChargeType
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        ctx.sender.role.may_manage(op.charge_type)
    }

    fn message_parameters(&self, op: &ChargeOperation, ctx: &Ctx) -> Vec<String> {
        vec![ctx.sender.role.to_string(), op.charge_type.to_string()]
    }
}

pub struct ChargeMustExist;

impl ValidationRule<ChargeOperation, Ctx> for ChargeMustExist {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeMustExist
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        !op.operation_type.requires_existing_charge() || ctx.existing_charge.is_some()
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.charge_identifier().to_string()]
    }
}

pub struct ChargeMustNotExist;

impl ValidationRule<ChargeOperation, Ctx> for ChargeMustNotExist {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeAlreadyExists
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        op.operation_type != OperationType::Create || ctx.existing_charge.is_none()
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.charge_identifier().to_string()]
    }
}

pub struct ResolutionUnchanged;

impl ValidationRule<ChargeOperation, Ctx> for ResolutionUnchanged {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeResolutionCanNotBeUpdated
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        existing(op, ctx, &[OperationType::Update, OperationType::CancelStop])
            .map_or(true, |charge| charge.resolution() == op.resolution)
    }

    fn message_parameters(&self, op: &ChargeOperation, ctx: &Ctx) -> Vec<String> {
        let current = ctx
            .existing_charge
            .as_ref()
            .map(|c| c.resolution().to_string())
            .unwrap_or_default();
        vec![current, op.resolution.to_string()]
    }
}

/// A tariff's tax indicator is fixed for the period it would replace.
pub struct TariffTaxIndicatorUnchanged;

impl ValidationRule<ChargeOperation, Ctx> for TariffTaxIndicatorUnchanged {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChangingTariffTaxValueNotAllowed
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        if op.charge_type != ChargeType::Tariff {
            return true;
        }
        let Some(charge) = existing(op, ctx, &[OperationType::Update, OperationType::CancelStop])
        else {
            return true;
        };
        charge
            .period_at(op.start_date_time)
            .or_else(|| charge.latest_period())
            .map_or(true, |period| period.tax_indicator == op.tax_indicator)
    }
}

pub struct UpdateBeforeStopDate;

impl ValidationRule<ChargeOperation, Ctx> for UpdateBeforeStopDate {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::UpdateChargeMustHaveEffectiveDateBeforeStopDate
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        existing(op, ctx, &[OperationType::Update])
            .and_then(Charge::stop_date)
            .map_or(true, |stop| op.start_date_time < stop)
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.start_date_time.to_rfc3339()]
    }
}

pub struct StopNotBeforeChargeStart;

impl ValidationRule<ChargeOperation, Ctx> for StopNotBeforeChargeStart {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::StopDateMustNotPrecedeChargeStart
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        existing(op, ctx, &[OperationType::Stop])
            .and_then(Charge::start_date)
            .map_or(true, |start| op.stop_date() >= start)
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.stop_date().to_rfc3339()]
    }
}

/// An existing stop may be moved earlier, never later.
pub struct StopMustNotExtendExistingStop;

impl ValidationRule<ChargeOperation, Ctx> for StopMustNotExtendExistingStop {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::StopMustNotExtendExistingStop
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        existing(op, ctx, &[OperationType::Stop])
            .and_then(Charge::stop_date)
            .map_or(true, |stop| op.stop_date() <= stop)
    }

    fn message_parameters(&self, op: &ChargeOperation, ctx: &Ctx) -> Vec<String> {
        let current = ctx
            .existing_charge
            .as_ref()
            .and_then(Charge::stop_date)
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();
        vec![current, op.stop_date().to_rfc3339()]
    }
}

pub struct CancelStopRequiresStoppedCharge;

impl ValidationRule<ChargeOperation, Ctx> for CancelStopRequiresStoppedCharge {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::CancelStopRequiresStoppedCharge
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        existing(op, ctx, &[OperationType::CancelStop]).map_or(true, Charge::is_stopped)
    }
}

pub struct CancelStopStartsAtStopDate;

impl ValidationRule<ChargeOperation, Ctx> for CancelStopStartsAtStopDate {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::CancelStopMustStartAtStopDate
    }

    fn is_valid(&self, op: &ChargeOperation, ctx: &Ctx) -> bool {
        existing(op, ctx, &[OperationType::CancelStop])
            .and_then(Charge::stop_date)
            .map_or(true, |stop| op.start_date_time == stop)
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.start_date_time.to_rfc3339()]
    }
}
