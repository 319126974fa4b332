//! Indicator precomputation.
//!
//! Every indicator runs once over the full series; the resulting columns are
//! zipped into one `IndicatorRow` per bar so later stages read a fixed schema
//! instead of looking series up by name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::domain::Bar;
use crate::indicators::{Bollinger, Indicator, Rsi, Sma};

/// Derived indicator values for one bar. `None` during each window's warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    /// Trailing mean volume over `volume_window` bars.
    pub avg_volume: Option<f64>,
    /// Close SMA over `ma_fast` bars.
    pub ma_fast: Option<f64>,
    /// Close SMA over `ma_slow` bars.
    pub ma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
}

/// The indicator instances for a given configuration, in column order.
pub struct IndicatorSet {
    avg_volume: Sma,
    ma_fast: Sma,
    ma_slow: Sma,
    rsi: Rsi,
    bb_mid: Bollinger,
    bb_upper: Bollinger,
    bb_lower: Bollinger,
}

impl IndicatorSet {
    pub fn from_config(config: &IndicatorConfig) -> Self {
        let k = config.bollinger_multiplier;
        Self {
            avg_volume: Sma::volume(config.volume_window),
            ma_fast: Sma::close(config.ma_fast),
            ma_slow: Sma::close(config.ma_slow),
            rsi: Rsi::new(config.rsi_period),
            bb_mid: Bollinger::middle(config.bollinger_period, k),
            bb_upper: Bollinger::upper(config.bollinger_period, k),
            bb_lower: Bollinger::lower(config.bollinger_period, k),
        }
    }

    fn all(&self) -> [&dyn Indicator; 7] {
        [
            &self.avg_volume,
            &self.ma_fast,
            &self.ma_slow,
            &self.rsi,
            &self.bb_mid,
            &self.bb_upper,
            &self.bb_lower,
        ]
    }

    /// Longest warm-up across the set: rows before this index have at least
    /// one `None` field.
    pub fn warmup(&self) -> usize {
        self.all().iter().map(|i| i.lookback()).max().unwrap_or(0)
    }

    /// Compute every indicator and zip the columns into rows.
    pub fn compute(&self, bars: &[Bar]) -> Vec<IndicatorRow> {
        let columns: Vec<Vec<Option<f64>>> = self
            .all()
            .iter()
            .map(|indicator| {
                let series = indicator.compute(bars);
                debug_assert_eq!(
                    series.len(),
                    bars.len(),
                    "indicator '{}' produced {} values for {} bars",
                    indicator.name(),
                    series.len(),
                    bars.len(),
                );
                series
            })
            .collect();

        bars.iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                date: bar.date,
                avg_volume: columns[0][i],
                ma_fast: columns[1][i],
                ma_slow: columns[2][i],
                rsi: columns[3][i],
                bb_mid: columns[4][i],
                bb_upper: columns[5][i],
                bb_lower: columns[6][i],
            })
            .collect()
    }
}

/// Compute the indicator rows for `bars` with the given windows.
pub fn compute_indicators(bars: &[Bar], config: &IndicatorConfig) -> Vec<IndicatorRow> {
    IndicatorSet::from_config(config).compute(bars)
}
