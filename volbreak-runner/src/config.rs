//! Analysis configuration file (TOML).
//!
//! ```toml
//! [analysis]
//! ticker = "AAPL"
//! start_date = "2023-01-01"
//! end_date = "2024-12-31"
//!
//! [thresholds]
//! volume_threshold_pct = 200.0
//! price_change_threshold_pct = 2.0
//! holding_period_days = 10
//! miss_policy = "exact"
//!
//! [indicators]
//! volume_window = 20
//! ```
//!
//! `[thresholds]` and `[indicators]` are optional and default field by field.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use volbreak_core::{BreakoutConfig, IndicatorConfig, MissPolicy};

use crate::data_loader::LoadOptions;

/// Errors from reading or validating an analysis config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("please enter a valid ticker symbol")]
    EmptyTicker,

    #[error("start date {start} is after end date {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Engine(#[from] volbreak_core::ConfigError),
}

/// `[analysis]`: what to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// `[thresholds]`: classifier and holding-period parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsSection {
    pub volume_threshold_pct: f64,
    pub price_change_threshold_pct: f64,
    pub holding_period_days: u32,
    pub miss_policy: MissPolicy,
}

impl Default for ThresholdsSection {
    fn default() -> Self {
        let d = BreakoutConfig::default();
        Self {
            volume_threshold_pct: d.volume_threshold_pct,
            price_change_threshold_pct: d.price_change_threshold_pct,
            holding_period_days: d.holding_period_days,
            miss_policy: d.miss_policy,
        }
    }
}

/// A complete analysis request as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub thresholds: ThresholdsSection,
    #[serde(default)]
    pub indicators: IndicatorConfig,
}

impl AnalysisConfig {
    /// Config with default thresholds and indicators.
    pub fn new(ticker: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            analysis: AnalysisSection {
                ticker: ticker.into(),
                start_date,
                end_date,
            },
            thresholds: ThresholdsSection::default(),
            indicators: IndicatorConfig::default(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Trim and upper-case the ticker.
    pub fn normalize(&mut self) {
        self.analysis.ticker = self.analysis.ticker.trim().to_uppercase();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.ticker.trim().is_empty() {
            return Err(ConfigError::EmptyTicker);
        }
        if self.analysis.start_date > self.analysis.end_date {
            return Err(ConfigError::DateRange {
                start: self.analysis.start_date,
                end: self.analysis.end_date,
            });
        }
        self.breakout_config().validate()?;
        Ok(())
    }

    pub fn ticker(&self) -> &str {
        &self.analysis.ticker
    }

    /// The engine-facing part of the config.
    pub fn breakout_config(&self) -> BreakoutConfig {
        BreakoutConfig {
            volume_threshold_pct: self.thresholds.volume_threshold_pct,
            price_change_threshold_pct: self.thresholds.price_change_threshold_pct,
            holding_period_days: self.thresholds.holding_period_days,
            miss_policy: self.thresholds.miss_policy,
            indicators: self.indicators.clone(),
        }
    }

    /// Load options for this config's date range.
    pub fn load_options(&self, offline: bool, synthetic: bool, input: Option<PathBuf>) -> LoadOptions {
        LoadOptions {
            start: self.analysis.start_date,
            end: self.analysis.end_date,
            offline,
            synthetic,
            input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[analysis]
ticker = " aapl "
start_date = "2023-01-01"
end_date = "2024-12-31"

[thresholds]
volume_threshold_pct = 150.0
price_change_threshold_pct = 3.0
holding_period_days = 5
miss_policy = "next_trading_day"

[indicators]
volume_window = 10
rsi_period = 7
"#;

    #[test]
    fn parses_full_document() {
        let cfg = AnalysisConfig::from_toml(FULL).unwrap();
        assert_eq!(cfg.ticker(), "AAPL");
        assert_eq!(cfg.thresholds.holding_period_days, 5);
        assert_eq!(cfg.thresholds.miss_policy, MissPolicy::NextTradingDay);
        assert_eq!(cfg.indicators.volume_window, 10);
        assert_eq!(cfg.indicators.rsi_period, 7);
        // unspecified indicator fields keep their defaults
        assert_eq!(cfg.indicators.ma_slow, 200);

        let engine = cfg.breakout_config();
        assert_eq!(engine.volume_threshold_pct, 150.0);
        assert_eq!(engine.indicators.volume_window, 10);
    }

    #[test]
    fn optional_sections_default() {
        let cfg = AnalysisConfig::from_toml(
            "[analysis]\nticker = \"SPY\"\nstart_date = \"2024-01-01\"\nend_date = \"2024-06-30\"\n",
        )
        .unwrap();
        assert_eq!(cfg.breakout_config(), BreakoutConfig::default());
    }

    #[test]
    fn rejects_empty_ticker() {
        let err = AnalysisConfig::from_toml(
            "[analysis]\nticker = \"  \"\nstart_date = \"2024-01-01\"\nend_date = \"2024-06-30\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTicker));
        assert!(err.to_string().contains("valid ticker"));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = AnalysisConfig::from_toml(
            "[analysis]\nticker = \"SPY\"\nstart_date = \"2024-06-30\"\nend_date = \"2024-01-01\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DateRange { .. }));
    }

    #[test]
    fn rejects_invalid_thresholds() {
        let toml = "[analysis]\nticker = \"SPY\"\nstart_date = \"2024-01-01\"\nend_date = \"2024-06-30\"\n\n[thresholds]\nholding_period_days = 0\n";
        let err = AnalysisConfig::from_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Engine(volbreak_core::ConfigError::HoldingPeriod)
        ));
    }

    #[test]
    fn rejects_unknown_miss_policy() {
        let toml = "[analysis]\nticker = \"SPY\"\nstart_date = \"2024-01-01\"\nend_date = \"2024-06-30\"\n\n[thresholds]\nmiss_policy = \"nearest\"\n";
        assert!(matches!(
            AnalysisConfig::from_toml(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let cfg = AnalysisConfig::from_toml(FULL).unwrap();
        let text = cfg.to_toml().unwrap();
        assert_eq!(AnalysisConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AnalysisConfig::from_file(Path::new("/nonexistent/volbreak.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
