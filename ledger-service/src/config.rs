//! Configuration for the ledger service

use std::env;
use std::str::FromStr;

use common::decimal::{ExchangeRate, Money};
use common::error::{Error, Result};
use cuadre_engine::{CalculatorConfig, DEFAULT_TOLERANCE};
use rust_decimal::Decimal;

/// Tolerance environment variable
pub const TOLERANCE_VAR: &str = "CUADRE_TOLERANCE";
/// USD surplus toggle environment variable
pub const APPLY_EXCESS_USD_VAR: &str = "CUADRE_APPLY_EXCESS_USD";
/// Default exchange rate environment variable
pub const EXCHANGE_RATE_VAR: &str = "CUADRE_EXCHANGE_RATE";

/// Configuration for reconciling periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuadreConfig {
    /// Balance tolerance in Bs
    pub tolerance: Money,
    /// Default for crediting a USD surplus toward the Bs side
    pub apply_excess_usd: bool,
    /// Rate used when a reconciliation request does not carry one
    pub default_exchange_rate: Option<ExchangeRate>,
}

impl Default for CuadreConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            apply_excess_usd: false,
            default_exchange_rate: None,
        }
    }
}

impl CuadreConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create a configuration from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TOLERANCE_VAR) {
            config.tolerance = parse_decimal(TOLERANCE_VAR, &raw)?;
        }

        if let Some(raw) = lookup(APPLY_EXCESS_USD_VAR) {
            config.apply_excess_usd = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                other => {
                    return Err(Error::ConfigurationError(format!(
                        "{} must be true/false, got {}", APPLY_EXCESS_USD_VAR, other
                    )))
                }
            };
        }

        if let Some(raw) = lookup(EXCHANGE_RATE_VAR) {
            if !raw.trim().is_empty() {
                config.default_exchange_rate = Some(parse_decimal(EXCHANGE_RATE_VAR, &raw)?);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Create a new configuration with custom values
    pub fn new(tolerance: Money, apply_excess_usd: bool, default_exchange_rate: Option<ExchangeRate>) -> Result<Self> {
        let config = Self {
            tolerance,
            apply_excess_usd,
            default_exchange_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check tolerance and default rate
    pub fn validate(&self) -> Result<()> {
        if self.tolerance < Decimal::ZERO {
            return Err(Error::ConfigurationError(format!(
                "Tolerance must not be negative, got {}", self.tolerance
            )));
        }

        if let Some(rate) = self.default_exchange_rate {
            if rate <= Decimal::ZERO {
                return Err(Error::ConfigurationError(format!(
                    "Default exchange rate must be greater than zero, got {}", rate
                )));
            }
        }

        Ok(())
    }

    /// Calculator policy derived from this configuration
    pub fn calculator_config(&self) -> Result<CalculatorConfig> {
        CalculatorConfig::new(self.tolerance)
    }
}

fn parse_decimal(key: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| Error::ConfigurationError(format!("{} is not a decimal ({}): {}", key, raw, e)))
}
