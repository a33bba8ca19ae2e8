//! Configuration module
//!
//! Application settings are read from a TOML file
//! (`~/.config/market-charges/config.toml` by default). Every section and
//! every key has a default, so a partial file is valid.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::errors::InfraError;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("market-charges")
        .join("config.toml")
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub market: MarketConfig,
    pub validation: ValidationConfig,
    pub persistence: PersistenceConfig,
    pub events: EventsConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        Ok(toml::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `market_charges=debug`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Market-wide settings shared by validation and notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Offset of the market's local time from UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// ISO 4217 code attached to price notifications.
    pub currency: String,
    /// Market id of the metering point administrator receiving bundles.
    pub metering_point_administrator_id: String,
}

impl MarketConfig {
    /// Local offset used by the midnight rule. Out-of-range values fall back to UTC.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 60,
            currency: "DKK".to_string(),
            metering_point_administrator_id: "5790001330583".to_string(),
        }
    }
}

/// Limits used by the input validation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub max_operation_id_length: usize,
    pub max_charge_id_length: usize,
    pub max_name_length: usize,
    pub max_description_length: usize,
    pub max_price: Decimal,
    pub max_price_integer_digits: u32,
    pub max_price_decimals: u32,
    /// How far before the validation clock a start date may lie.
    pub start_date_max_days_in_past: i64,
    /// How far after the validation clock a start date may lie.
    pub start_date_max_days_in_future: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_operation_id_length: 36,
            max_charge_id_length: 10,
            max_name_length: 132,
            max_description_length: 2048,
            max_price: Decimal::new(1_000_000, 0),
            max_price_integer_digits: 8,
            max_price_decimals: 6,
            start_date_max_days_in_past: 31,
            start_date_max_days_in_future: 1095,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub retry_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_backoff_multiplier: f64,
    pub retry_max_delay_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_initial_delay_ms: 200,
            retry_backoff_multiplier: 2.0,
            retry_max_delay_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Capacity of the broadcast channel behind the event bus.
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.market.currency, "DKK");
        assert_eq!(cfg.validation.max_name_length, 132);
        assert_eq!(cfg.events.capacity, 1024);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [market]
            utc_offset_minutes = 0
            currency = "EUR"

            [validation]
            max_name_length = 50
            "#,
        )
        .unwrap();

        assert_eq!(cfg.market.utc_offset_minutes, 0);
        assert_eq!(cfg.market.currency, "EUR");
        assert_eq!(cfg.market.metering_point_administrator_id, "5790001330583");
        assert_eq!(cfg.validation.max_name_length, 50);
        assert_eq!(cfg.validation.max_charge_id_length, 10);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"").unwrap();

        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, InfraError::Io(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = AppConfig::from_toml("[market\ncurrency = 1").unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn local_offset_uses_minutes() {
        let market = MarketConfig {
            utc_offset_minutes: 120,
            ..MarketConfig::default()
        };
        assert_eq!(market.local_offset().local_minus_utc(), 7200);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let market = MarketConfig {
            utc_offset_minutes: 100_000,
            ..MarketConfig::default()
        };
        assert_eq!(market.local_offset().local_minus_utc(), 0);
    }
}
