//! Self-contained rules over a single operation

use chrono::{Duration, FixedOffset, Timelike};
use rust_decimal::Decimal;

use crate::domain::charge::{ChargeType, Resolution, VatClassification};
use crate::domain::document::{ChargeOperation, OperationType};
use crate::domain::validation::context::InputValidationContext;
use crate::domain::validation::identifier::ValidationRuleIdentifier;
use crate::domain::validation::rule::ValidationRule;

type Ctx = InputValidationContext;

pub struct OperationIdRequired;

impl ValidationRule<ChargeOperation, Ctx> for OperationIdRequired {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeOperationIdRequired
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !op.id.trim().is_empty()
    }
}

pub struct OperationIdLength {
    pub max: usize,
}

impl ValidationRule<ChargeOperation, Ctx> for OperationIdLength {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeOperationIdLengthValidation
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.id.chars().count() <= self.max
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.id.clone(), self.max.to_string()]
    }
}

pub struct ChargeIdRequired;

impl ValidationRule<ChargeOperation, Ctx> for ChargeIdRequired {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeIdRequiredValidation
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !op.charge_id.trim().is_empty()
    }
}

pub struct ChargeIdLength {
    pub max: usize,
}

impl ValidationRule<ChargeOperation, Ctx> for ChargeIdLength {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeIdLengthValidation
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.charge_id.chars().count() <= self.max
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.charge_id.clone(), self.max.to_string()]
    }
}

pub struct ChargeOwnerRequired;

impl ValidationRule<ChargeOperation, Ctx> for ChargeOwnerRequired {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeOwnerIsRequiredValidation
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !op.charge_owner.trim().is_empty()
    }
}

/// GLN (13) or EIC (16) number. Empty owners are left to [`ChargeOwnerRequired`].
pub struct ChargeOwnerLength;

impl ValidationRule<ChargeOperation, Ctx> for ChargeOwnerLength {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeOwnerHasLengthLimits
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        let len = op.charge_owner.chars().count();
        len == 0 || len == 13 || len == 16
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.charge_owner.clone()]
    }
}

pub struct ChargeNameRequired;

impl ValidationRule<ChargeOperation, Ctx> for ChargeNameRequired {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeNameIsRequired
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !op.operation_type.carries_period() || !op.name.trim().is_empty()
    }
}

pub struct ChargeNameMaxLength {
    pub max: usize,
}

impl ValidationRule<ChargeOperation, Ctx> for ChargeNameMaxLength {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeNameHasMaximumLength
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.name.chars().count() <= self.max
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.name.chars().count().to_string(), self.max.to_string()]
    }
}

pub struct ChargeDescriptionMaxLength {
    pub max: usize,
}

impl ValidationRule<ChargeOperation, Ctx> for ChargeDescriptionMaxLength {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeDescriptionHasMaximumLength
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.description.chars().count() <= self.max
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.description.chars().count().to_string(), self.max.to_string()]
    }
}

pub struct VatClassificationKnown;

impl ValidationRule<ChargeOperation, Ctx> for VatClassificationKnown {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::VatClassificationValidation
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !op.operation_type.carries_period() || op.vat_classification != VatClassification::Unknown
    }
}

/// Allowed resolutions for one charge type.
pub struct ResolutionForChargeType {
    charge_type: ChargeType,
    allowed: &'static [Resolution],
    identifier: ValidationRuleIdentifier,
}

impl ResolutionForChargeType {
    pub fn tariff() -> Self {
        Self {
            charge_type: ChargeType::Tariff,
            allowed: &[Resolution::QuarterHourly, Resolution::Hourly, Resolution::Daily],
            identifier: ValidationRuleIdentifier::ResolutionTariffValidation,
        }
    }

    pub fn fee() -> Self {
        Self {
            charge_type: ChargeType::Fee,
            allowed: &[Resolution::Monthly],
            identifier: ValidationRuleIdentifier::ResolutionFeeValidation,
        }
    }

    pub fn subscription() -> Self {
        Self {
            charge_type: ChargeType::Subscription,
            allowed: &[Resolution::Monthly],
            identifier: ValidationRuleIdentifier::ResolutionSubscriptionValidation,
        }
    }
}

impl ValidationRule<ChargeOperation, Ctx> for ResolutionForChargeType {
    fn identifier(&self) -> ValidationRuleIdentifier {
        self.identifier
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.charge_type != self.charge_type
            || !op.operation_type.carries_period()
            || self.allowed.contains(&op.resolution)
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.resolution.to_string(), op.charge_type.to_string()]
    }
}

/// A tariff's price series covers exactly one day at its resolution.
pub struct TariffPriceCount;

impl ValidationRule<ChargeOperation, Ctx> for TariffPriceCount {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargeTypeTariffPriceCount
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.charge_type != ChargeType::Tariff
            || op.points.is_empty()
            || op.resolution.points_per_day() == Some(op.points.len())
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.points.len().to_string(), op.resolution.to_string()]
    }
}

pub struct FeeAndSubscriptionPriceCount;

impl ValidationRule<ChargeOperation, Ctx> for FeeAndSubscriptionPriceCount {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargePriceCountForFeeAndSubscription
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.charge_type == ChargeType::Tariff || op.points.len() <= 1
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.points.len().to_string()]
    }
}

pub struct MaximumPrice {
    pub max: Decimal,
}

impl ValidationRule<ChargeOperation, Ctx> for MaximumPrice {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::MaximumPrice
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.points.iter().all(|p| p.price <= self.max)
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        op.points
            .iter()
            .filter(|p| p.price > self.max)
            .map(|p| format!("{}@{}", p.price, p.position))
            .collect()
    }
}

pub struct PriceDigitsAndDecimals {
    pub integer_digits: u32,
    pub decimals: u32,
}

impl PriceDigitsAndDecimals {
    fn fits(&self, price: Decimal) -> bool {
        let within_decimals = price.normalize().scale() <= self.decimals;
        let within_digits = match 10i64.checked_pow(self.integer_digits) {
            Some(limit) => price.abs().trunc() < Decimal::from(limit),
            None => true,
        };
        within_decimals && within_digits
    }
}

impl ValidationRule<ChargeOperation, Ctx> for PriceDigitsAndDecimals {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::ChargePriceMaximumDigitsAndDecimals
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.points.iter().all(|p| self.fits(p.price))
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        op.points
            .iter()
            .filter(|p| !self.fits(p.price))
            .map(|p| format!("{}@{}", p.price, p.position))
            .collect()
    }
}

/// Start date lies in `[now - days_in_past, now + days_in_future]`.
pub struct StartDateWindow {
    pub days_in_past: i64,
    pub days_in_future: i64,
}

impl ValidationRule<ChargeOperation, Ctx> for StartDateWindow {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::StartDateValidation
    }

    fn is_valid(&self, op: &ChargeOperation, context: &Ctx) -> bool {
        let earliest = context.now - Duration::days(self.days_in_past);
        let latest = context.now + Duration::days(self.days_in_future);
        earliest <= op.start_date_time && op.start_date_time <= latest
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.start_date_time.to_rfc3339()]
    }
}

/// Start date falls on midnight in the market's local time.
pub struct StartDateAtLocalMidnight {
    pub offset: FixedOffset,
}

impl ValidationRule<ChargeOperation, Ctx> for StartDateAtLocalMidnight {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::StartDateMustBeAtLocalMidnight
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        let local = op.start_date_time.with_timezone(&self.offset);
        local.hour() == 0 && local.minute() == 0 && local.second() == 0 && local.nanosecond() == 0
    }

    fn message_parameters(&self, op: &ChargeOperation, _: &Ctx) -> Vec<String> {
        vec![op.start_date_time.with_timezone(&self.offset).to_rfc3339()]
    }
}

/// Create and Update always produce open-ended periods.
pub struct TerminationDateNotAllowed;

impl ValidationRule<ChargeOperation, Ctx> for TerminationDateNotAllowed {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::CreateChargeIsNotAllowedATerminationDate
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !matches!(op.operation_type, OperationType::Create | OperationType::Update)
            || op.end_date_time.is_none()
    }
}

pub struct StopDateMatchesEffectiveDate;

impl ValidationRule<ChargeOperation, Ctx> for StopDateMatchesEffectiveDate {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::StopDateMustMatchEffectiveDate
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.operation_type != OperationType::Stop
            || op.end_date_time.map_or(true, |end| end == op.start_date_time)
    }
}

pub struct TransparentInvoicingNotAllowedForFee;

impl ValidationRule<ChargeOperation, Ctx> for TransparentInvoicingNotAllowedForFee {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::TransparentInvoicingIsNotAllowedForFee
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        !(op.charge_type == ChargeType::Fee && op.transparent_invoicing)
    }
}

pub struct TaxIndicatorOnlyForTariffs;

impl ValidationRule<ChargeOperation, Ctx> for TaxIndicatorOnlyForTariffs {
    fn identifier(&self) -> ValidationRuleIdentifier {
        ValidationRuleIdentifier::TaxIndicatorMustBeFalseForFeeAndSubscription
    }

    fn is_valid(&self, op: &ChargeOperation, _: &Ctx) -> bool {
        op.charge_type == ChargeType::Tariff || !op.tax_indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charge::Point;
    use crate::test_support::{day, operation};
    use chrono::{TimeZone, Utc};

    fn ctx() -> Ctx {
        InputValidationContext { now: day(0) }
    }

    fn create() -> ChargeOperation {
        operation("op-1", OperationType::Create, "T-1")
    }

    fn hourly_points(count: u32) -> Vec<Point> {
        (1..=count).map(|i| Point::new(i, Decimal::new(125, 2))).collect()
    }

    #[test]
    fn ids_and_owner_are_required() {
        let mut op = create();
        assert!(OperationIdRequired.is_valid(&op, &ctx()));
        assert!(ChargeIdRequired.is_valid(&op, &ctx()));
        assert!(ChargeOwnerRequired.is_valid(&op, &ctx()));

        op.id = String::new();
        op.charge_id = " ".into();
        op.charge_owner = String::new();
        assert!(!OperationIdRequired.is_valid(&op, &ctx()));
        assert!(!ChargeIdRequired.is_valid(&op, &ctx()));
        assert!(!ChargeOwnerRequired.is_valid(&op, &ctx()));
        // empty owner is reported by the required rule only
        assert!(ChargeOwnerLength.is_valid(&op, &ctx()));
    }

    #[test]
    fn length_limits() {
        let mut op = create();
        op.charge_id = "12345678901".into();
        assert!(!ChargeIdLength { max: 10 }.is_valid(&op, &ctx()));
        op.charge_id = "1234567890".into();
        assert!(ChargeIdLength { max: 10 }.is_valid(&op, &ctx()));

        op.id = "x".repeat(37);
        assert!(!OperationIdLength { max: 36 }.is_valid(&op, &ctx()));

        op.charge_owner = "57900000000010".into();
        assert!(!ChargeOwnerLength.is_valid(&op, &ctx()));
        op.charge_owner = "10X1001A1001A57U".into();
        assert!(ChargeOwnerLength.is_valid(&op, &ctx()));
    }

    #[test]
    fn name_required_only_for_period_operations() {
        let mut op = create();
        op.name = String::new();
        assert!(!ChargeNameRequired.is_valid(&op, &ctx()));

        op.operation_type = OperationType::Stop;
        assert!(ChargeNameRequired.is_valid(&op, &ctx()));
    }

    #[test]
    fn name_and_description_max_length_count_chars() {
        let mut op = create();
        op.name = "æ".repeat(132);
        assert!(ChargeNameMaxLength { max: 132 }.is_valid(&op, &ctx()));
        op.name.push('ø');
        let rule = ChargeNameMaxLength { max: 132 };
        assert!(!rule.is_valid(&op, &ctx()));
        assert_eq!(rule.message_parameters(&op, &ctx()), vec!["133", "132"]);

        op.description = "d".repeat(2049);
        assert!(!ChargeDescriptionMaxLength { max: 2048 }.is_valid(&op, &ctx()));
    }

    #[test]
    fn vat_must_be_known_for_period_operations() {
        let mut op = create();
        op.vat_classification = VatClassification::Unknown;
        assert!(!VatClassificationKnown.is_valid(&op, &ctx()));
        op.operation_type = OperationType::Stop;
        assert!(VatClassificationKnown.is_valid(&op, &ctx()));
    }

    #[test]
    fn resolution_must_match_charge_type() {
        let mut op = create();
        op.resolution = Resolution::Monthly;
        assert!(!ResolutionForChargeType::tariff().is_valid(&op, &ctx()));
        // other charge types' rules do not apply to a tariff
        assert!(ResolutionForChargeType::fee().is_valid(&op, &ctx()));

        op.charge_type = ChargeType::Fee;
        assert!(ResolutionForChargeType::fee().is_valid(&op, &ctx()));
        op.resolution = Resolution::Hourly;
        assert!(!ResolutionForChargeType::fee().is_valid(&op, &ctx()));

        op.charge_type = ChargeType::Subscription;
        assert!(!ResolutionForChargeType::subscription().is_valid(&op, &ctx()));
    }

    #[test]
    fn tariff_price_count_matches_resolution() {
        let mut op = create();
        assert!(TariffPriceCount.is_valid(&op, &ctx()));

        op.points = hourly_points(24);
        assert!(TariffPriceCount.is_valid(&op, &ctx()));

        op.points = hourly_points(23);
        assert!(!TariffPriceCount.is_valid(&op, &ctx()));

        op.resolution = Resolution::QuarterHourly;
        op.points = hourly_points(96);
        assert!(TariffPriceCount.is_valid(&op, &ctx()));
    }

    #[test]
    fn resolution_and_price_count_are_reported_together() {
        let mut op = create();
        op.resolution = Resolution::Monthly;
        op.points = hourly_points(24);
        assert!(!ResolutionForChargeType::tariff().is_valid(&op, &ctx()));
        assert!(!TariffPriceCount.is_valid(&op, &ctx()));
    }

    #[test]
    fn fee_carries_single_price() {
        let mut op = create();
        op.charge_type = ChargeType::Fee;
        op.points = hourly_points(1);
        assert!(FeeAndSubscriptionPriceCount.is_valid(&op, &ctx()));
        op.points = hourly_points(2);
        assert!(!FeeAndSubscriptionPriceCount.is_valid(&op, &ctx()));
    }

    #[test]
    fn maximum_price() {
        let mut op = create();
        op.points = vec![Point::new(1, Decimal::new(1_000_000, 0))];
        let rule = MaximumPrice {
            max: Decimal::new(1_000_000, 0),
        };
        assert!(rule.is_valid(&op, &ctx()));
        op.points.push(Point::new(2, Decimal::new(1_000_001, 0)));
        assert!(!rule.is_valid(&op, &ctx()));
        assert_eq!(rule.message_parameters(&op, &ctx()), vec!["1000001@2"]);
    }

    #[test]
    fn price_digits_and_decimals() {
        let rule = PriceDigitsAndDecimals {
            integer_digits: 8,
            decimals: 6,
        };
        let mut op = create();
        op.points = vec![Point::new(1, Decimal::new(99_999_999_123_456, 6))];
        assert!(rule.is_valid(&op, &ctx()));

        op.points = vec![Point::new(1, Decimal::new(1_234_567, 7))];
        assert!(!rule.is_valid(&op, &ctx()));

        // trailing zeros do not count as decimals
        op.points = vec![Point::new(1, Decimal::new(1_500_000_000, 9))];
        assert!(rule.is_valid(&op, &ctx()));

        op.points = vec![Point::new(1, Decimal::new(100_000_000, 0))];
        assert!(!rule.is_valid(&op, &ctx()));
    }

    #[test]
    fn start_date_window() {
        let rule = StartDateWindow {
            days_in_past: 31,
            days_in_future: 1095,
        };
        let mut op = create();
        op.start_date_time = day(-31);
        assert!(rule.is_valid(&op, &ctx()));
        op.start_date_time = day(-32);
        assert!(!rule.is_valid(&op, &ctx()));
        op.start_date_time = day(1096);
        assert!(!rule.is_valid(&op, &ctx()));
    }

    #[test]
    fn start_date_must_be_local_midnight() {
        let cet = StartDateAtLocalMidnight {
            offset: FixedOffset::east_opt(3600).unwrap(),
        };
        let utc = StartDateAtLocalMidnight {
            offset: FixedOffset::east_opt(0).unwrap(),
        };
        let mut op = create();

        op.start_date_time = Utc.with_ymd_and_hms(2026, 3, 1, 23, 0, 0).unwrap();
        assert!(cet.is_valid(&op, &ctx()));
        assert!(!utc.is_valid(&op, &ctx()));

        op.start_date_time = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert!(utc.is_valid(&op, &ctx()));
        assert!(!cet.is_valid(&op, &ctx()));
    }

    #[test]
    fn create_and_update_must_be_open_ended() {
        let mut op = create();
        op.end_date_time = Some(day(5));
        assert!(!TerminationDateNotAllowed.is_valid(&op, &ctx()));
        op.operation_type = OperationType::Update;
        assert!(!TerminationDateNotAllowed.is_valid(&op, &ctx()));
        op.operation_type = OperationType::CancelStop;
        assert!(TerminationDateNotAllowed.is_valid(&op, &ctx()));
    }

    #[test]
    fn stop_end_date_must_equal_start() {
        let mut op = operation("op-1", OperationType::Stop, "T-1");
        assert!(StopDateMatchesEffectiveDate.is_valid(&op, &ctx()));
        op.end_date_time = Some(op.start_date_time);
        assert!(StopDateMatchesEffectiveDate.is_valid(&op, &ctx()));
        op.end_date_time = Some(op.start_date_time + Duration::days(1));
        assert!(!StopDateMatchesEffectiveDate.is_valid(&op, &ctx()));
    }

    #[test]
    fn fee_and_subscription_flags() {
        let mut op = create();
        op.charge_type = ChargeType::Fee;
        op.transparent_invoicing = true;
        assert!(!TransparentInvoicingNotAllowedForFee.is_valid(&op, &ctx()));

        op.tax_indicator = true;
        assert!(!TaxIndicatorOnlyForTariffs.is_valid(&op, &ctx()));
        op.charge_type = ChargeType::Tariff;
        assert!(TaxIndicatorOnlyForTariffs.is_valid(&op, &ctx()));
        assert!(TransparentInvoicingNotAllowedForFee.is_valid(&op, &ctx()));
    }
}
