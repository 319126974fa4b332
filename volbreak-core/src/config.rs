//! Engine configuration: thresholds, holding period, and indicator windows.
//!
//! All fields have defaults, so a partially specified TOML/JSON document
//! deserializes into a complete config. `validate()` must pass before the
//! pipeline runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::forward_return::MissPolicy;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("volume threshold must be a finite value >= 0 (got {0})")]
    VolumeThreshold(f64),

    #[error("price change threshold must be a finite value >= 0 (got {0})")]
    PriceChangeThreshold(f64),

    #[error("holding period must be at least 1 day")]
    HoldingPeriod,

    #[error("indicator window '{name}' must be at least 1")]
    Window { name: &'static str },

    #[error("bollinger multiplier must be a finite value >= 0 (got {0})")]
    BollingerMultiplier(f64),
}

/// Rolling-window lengths for the indicator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub volume_window: usize,
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            volume_window: 20,
            ma_fast: 50,
            ma_slow: 200,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("volume_window", self.volume_window),
            ("ma_fast", self.ma_fast),
            ("ma_slow", self.ma_slow),
            ("rsi_period", self.rsi_period),
            ("bollinger_period", self.bollinger_period),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ConfigError::Window { name });
        }
        if !is_non_negative(self.bollinger_multiplier) {
            return Err(ConfigError::BollingerMultiplier(self.bollinger_multiplier));
        }
        Ok(())
    }
}

/// Full configuration for one analysis run.
///
/// Thresholds are percentages: a volume threshold of 200.0 means "volume above
/// twice the trailing average", a price change threshold of 2.0 means "close up
/// more than 2% on the day".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub volume_threshold_pct: f64,
    pub price_change_threshold_pct: f64,
    /// Calendar days, not trading days.
    pub holding_period_days: u32,
    pub miss_policy: MissPolicy,
    pub indicators: IndicatorConfig,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            volume_threshold_pct: 200.0,
            price_change_threshold_pct: 2.0,
            holding_period_days: 10,
            miss_policy: MissPolicy::Exact,
            indicators: IndicatorConfig::default(),
        }
    }
}

impl BreakoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_non_negative(self.volume_threshold_pct) {
            return Err(ConfigError::VolumeThreshold(self.volume_threshold_pct));
        }
        if !is_non_negative(self.price_change_threshold_pct) {
            return Err(ConfigError::PriceChangeThreshold(
                self.price_change_threshold_pct,
            ));
        }
        if self.holding_period_days == 0 {
            return Err(ConfigError::HoldingPeriod);
        }
        self.indicators.validate()
    }

    /// The two classifier thresholds.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            volume_threshold_pct: self.volume_threshold_pct,
            price_change_threshold_pct: self.price_change_threshold_pct,
        }
    }
}

/// Classifier thresholds, both in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub volume_threshold_pct: f64,
    pub price_change_threshold_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        BreakoutConfig::default().thresholds()
    }
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}
