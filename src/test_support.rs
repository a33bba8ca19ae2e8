//! Builders shared by unit tests

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::AppConfig;
use crate::domain::charge::{ChargeType, Resolution, VatClassification};
use crate::domain::document::{
    BusinessReasonCode, ChargeOperation, Document, DocumentParty, DocumentType, OperationType,
};
use crate::domain::market_participant::{MarketParticipant, MarketParticipantRole};

pub const SENDER_ID: &str = "5790000000001";
pub const MPA_ID: &str = "5790001330583";

/// Midnight UTC, `n` days after 2026-03-01.
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// Default configuration with the market clock on UTC.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.market.utc_offset_minutes = 0;
    config
}

pub fn document() -> Document {
    Document {
        id: "DOC-1".to_string(),
        document_type: DocumentType::RequestChangeOfPriceList,
        business_reason_code: BusinessReasonCode::UpdateChargeInformation,
        sender: DocumentParty::new(SENDER_ID, MarketParticipantRole::GridAccessProvider),
        recipient: DocumentParty::new(MPA_ID, MarketParticipantRole::MeteringPointAdministrator),
        created_date_time: day(0),
    }
}

/// Hourly tariff owned by [`SENDER_ID`], starting at `day(0)`.
pub fn operation(id: &str, operation_type: OperationType, charge_id: &str) -> ChargeOperation {
    ChargeOperation {
        id: id.to_string(),
        operation_type,
        charge_id: charge_id.to_string(),
        charge_type: ChargeType::Tariff,
        charge_owner: SENDER_ID.to_string(),
        resolution: Resolution::Hourly,
        name: "Net tariff".to_string(),
        description: String::new(),
        vat_classification: VatClassification::Vat25,
        tax_indicator: false,
        transparent_invoicing: false,
        start_date_time: day(0),
        end_date_time: None,
        points: Vec::new(),
        position: 0,
    }
}

pub fn grid_access_provider() -> MarketParticipant {
    MarketParticipant::new(SENDER_ID, vec![MarketParticipantRole::GridAccessProvider])
}

pub fn metering_point_administrator() -> MarketParticipant {
    MarketParticipant::new(MPA_ID, vec![MarketParticipantRole::MeteringPointAdministrator])
}
