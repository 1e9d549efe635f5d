//! `loancalc.toml` configuration.
//!
//! ```toml
//! [speed]
//! monthly_rate = "0.10"
//! period_unit = "months"   # days | weeks | months
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use loan_calc_core::loans::speed::SpeedLoanTerms;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "loancalc.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanCalcConfig {
    pub speed: SpeedLoanTerms,
}

impl LoanCalcConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;
        Self::from_toml(&content).map_err(|e| format!("Invalid config '{}': {}", path, e).into())
    }

    pub fn from_toml(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: LoanCalcConfig = toml::from_str(content)?;
        config.speed.check()?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise fall back to `./loancalc.toml`,
    /// then to built-in defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            tracing::debug!(path, "loading configuration");
            return Self::from_file(path);
        }
        if Path::new(DEFAULT_CONFIG_FILE).is_file() {
            tracing::debug!(path = DEFAULT_CONFIG_FILE, "loading configuration");
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }
        tracing::debug!("using default configuration");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_calc_core::PeriodUnit;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LoanCalcConfig::from_toml("").unwrap();
        assert_eq!(config, LoanCalcConfig::default());
        assert!(config.speed.is_default());
    }

    #[test]
    fn test_speed_section() {
        let config = LoanCalcConfig::from_toml(
            r#"
            [speed]
            monthly_rate = "0.12"
            period_unit = "weeks"
            "#,
        )
        .unwrap();
        assert_eq!(config.speed.monthly_rate, dec!(0.12));
        assert_eq!(config.speed.period_unit, PeriodUnit::Weeks);
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let err = LoanCalcConfig::from_toml("[speed]\nmonthly_rate = \"0\"\n").unwrap_err();
        assert!(err.to_string().contains("monthly_rate"));
    }

    #[test]
    fn test_unknown_unit_rejected() {
        assert!(LoanCalcConfig::from_toml("[speed]\nperiod_unit = \"years\"\n").is_err());
    }
}
