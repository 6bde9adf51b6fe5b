#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, FeeConfig};
use crate::utils::error::{DeliveryFeeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Fully resolved server settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub json_logs: bool,
    pub fees: FeeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            json_logs: false,
            fees: FeeConfig::default(),
        }
    }
}

impl ConfigProvider for Settings {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn fee_config(&self) -> &FeeConfig {
        &self.fees
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_positive_number("server.port", self.port, 1)?;
        self.fees.validate()
    }
}

impl Validate for FeeConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("fees.distance_step", self.distance_step, 1)?;
        validate_range(
            "fees.rush_hour_multiplier",
            self.rush_hour_multiplier,
            1.0,
            f64::MAX,
        )?;
        validate_range("fees.rush_hour_start", self.rush_hour_start, 0, 23)?;
        validate_range("fees.rush_hour_end", self.rush_hour_end, 1, 24)?;
        if self.rush_hour_end <= self.rush_hour_start {
            return Err(DeliveryFeeError::InvalidConfigValueError {
                field: "fees.rush_hour_end".to_string(),
                value: self.rush_hour_end.to_string(),
                reason: format!(
                    "Value must be later than fees.rush_hour_start ({})",
                    self.rush_hour_start
                ),
            });
        }
        validate_positive_number(
            "fees.max_items_no_bulk_fee",
            self.max_items_no_bulk_fee,
            self.max_items_no_surcharge,
        )?;
        Ok(())
    }
}
