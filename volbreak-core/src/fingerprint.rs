//! Run fingerprinting: deterministic identity of a dataset and a config.
//!
//! Both hashes are BLAKE3 over a fixed field order (no map iteration), so two
//! runs with the same bars and the same configuration always share hashes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BreakoutConfig;
use crate::domain::PriceSeries;

/// Hash every bar (date and OHLCV) in series order.
pub fn dataset_hash(series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    for bar in series.bars() {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Hash every parameter that can change the analysis output.
pub fn config_hash(config: &BreakoutConfig) -> String {
    let ind = &config.indicators;
    let mut hasher = blake3::Hasher::new();
    hasher.update(&config.volume_threshold_pct.to_le_bytes());
    hasher.update(&config.price_change_threshold_pct.to_le_bytes());
    hasher.update(&config.holding_period_days.to_le_bytes());
    hasher.update(config.miss_policy.as_str().as_bytes());
    for window in [
        ind.volume_window,
        ind.ma_fast,
        ind.ma_slow,
        ind.rsi_period,
        ind.bollinger_period,
    ] {
        hasher.update(&(window as u64).to_le_bytes());
    }
    hasher.update(&ind.bollinger_multiplier.to_le_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Identity of one analysis run, persisted in the run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub symbol: String,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub bar_count: usize,
    pub dataset_hash: String,
    pub config_hash: String,
}

impl RunFingerprint {
    pub fn new(series: &PriceSeries, config: &BreakoutConfig) -> Self {
        Self {
            symbol: series.symbol().to_string(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            bar_count: series.len(),
            dataset_hash: dataset_hash(series),
            config_hash: config_hash(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MissPolicy;
    use crate::indicators::make_bars;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new("SPY", make_bars(closes)).unwrap()
    }

    #[test]
    fn dataset_hash_is_deterministic() {
        assert_eq!(dataset_hash(&series(&[1.0, 2.0])), dataset_hash(&series(&[1.0, 2.0])));
    }

    #[test]
    fn dataset_hash_changes_with_data() {
        assert_ne!(dataset_hash(&series(&[1.0, 2.0])), dataset_hash(&series(&[1.0, 2.5])));
    }

    #[test]
    fn config_hash_tracks_every_parameter() {
        let base = BreakoutConfig::default();
        let h = config_hash(&base);
        assert_eq!(h, config_hash(&base.clone()));

        let mut c = base.clone();
        c.miss_policy = MissPolicy::NextTradingDay;
        assert_ne!(h, config_hash(&c));

        let mut c = base.clone();
        c.indicators.rsi_period = 7;
        assert_ne!(h, config_hash(&c));

        let mut c = base;
        c.holding_period_days = 11;
        assert_ne!(h, config_hash(&c));
    }

    #[test]
    fn fingerprint_of_empty_series() {
        let s = PriceSeries::new("EMPTY", vec![]).unwrap();
        let fp = RunFingerprint::new(&s, &BreakoutConfig::default());
        assert_eq!(fp.bar_count, 0);
        assert_eq!(fp.first_date, None);
        assert_eq!(fp.dataset_hash.len(), 64);
    }
}
