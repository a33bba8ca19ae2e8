//! Price series attached to charge operations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Time resolution of a charge's price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "PT15M")]
    QuarterHourly,
    #[serde(rename = "PT1H")]
    Hourly,
    #[serde(rename = "P1D")]
    Daily,
    #[serde(rename = "P1M")]
    Monthly,
    Unknown,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuarterHourly => "PT15M",
            Self::Hourly => "PT1H",
            Self::Daily => "P1D",
            Self::Monthly => "P1M",
            Self::Unknown => "Unknown",
        }
    }

    /// Number of points one day of prices holds at this resolution.
    ///
    /// `None` for resolutions that do not describe intra-day prices.
    pub fn points_per_day(&self) -> Option<usize> {
        match self {
            Self::QuarterHourly => Some(96),
            Self::Hourly => Some(24),
            Self::Daily => Some(1),
            Self::Monthly | Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One price in a series. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub position: u32,
    pub price: Decimal,
}

impl Point {
    pub fn new(position: u32, price: Decimal) -> Self {
        Self { position, price }
    }
}
