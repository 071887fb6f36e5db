//! Configuration loading from TOML files.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::BargainConfig;
use crate::error::{ConfigError, Result};

/// Root configuration.
///
/// Every threshold is threaded through explicitly; there is no hidden
/// process-wide state, so tests can run the engine with alternate
/// thresholds by constructing a [`BargainConfig`] directly.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bargain: BargainConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let b = &self.bargain;
        check_fraction("discount_p50_30d", b.discount_p50_30d)?;
        check_fraction("discount_p50_7d", b.discount_p50_7d)?;
        check_fraction("bargain_score_min", b.bargain_score_min)?;
        check_fraction("max_alloc_fraction", b.max_alloc_fraction)?;
        check_non_negative("min_vol_commodity", b.min_vol_commodity)?;
        check_non_negative("min_vol_noncommodity", b.min_vol_noncommodity)?;
        if b.max_units_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_units_cap",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if b.eta_h_default == 0 {
            return Err(ConfigError::InvalidValue {
                field: "eta_h_default",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn check_fraction(field: &'static str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be within [0, 1], got {value}"),
        }
        .into());
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be non-negative, got {value}"),
        }
        .into());
    }
    Ok(())
}
