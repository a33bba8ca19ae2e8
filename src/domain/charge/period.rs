//! Charge periods
//!
//! A period is one time-bounded set of charge attributes. Periods are owned
//! by their [`Charge`](super::Charge) and never shared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 9999-12-31T23:59:59Z
const OPEN_END_TIMESTAMP: i64 = 253_402_300_799;

/// End instant meaning "not yet stopped".
pub fn open_end() -> DateTime<Utc> {
    DateTime::from_timestamp(OPEN_END_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// VAT classification of a charge period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatClassification {
    NoVat,
    Vat25,
    Unknown,
}

impl Default for VatClassification {
    fn default() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargePeriod {
    pub name: String,
    pub description: String,
    pub vat_classification: VatClassification,
    pub tax_indicator: bool,
    pub transparent_invoicing: bool,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
}

impl ChargePeriod {
    /// Open-ended period starting at `start_date_time`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        vat_classification: VatClassification,
        tax_indicator: bool,
        transparent_invoicing: bool,
        start_date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            vat_classification,
            tax_indicator,
            transparent_invoicing,
            start_date_time,
            end_date_time: open_end(),
        }
    }

    pub fn with_end(mut self, end_date_time: DateTime<Utc>) -> Self {
        self.end_date_time = end_date_time;
        self
    }

    pub fn is_open_ended(&self) -> bool {
        self.end_date_time == open_end()
    }

    /// Whether `instant` falls in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_date_time <= instant && instant < self.end_date_time
    }
}
