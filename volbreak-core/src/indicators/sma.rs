//! Simple Moving Average (SMA).
//!
//! Trailing mean of one bar field over a lookback window, inclusive of the
//! current bar. Used for average volume and for the close moving averages.
//! Lookback: period - 1 (first valid value at index period-1).

use super::indicator::Indicator;
use crate::domain::{Bar, BarField};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: BarField,
    name: String,
}

impl Sma {
    pub fn new(period: usize, source: BarField) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source,
            name: format!("sma_{}_{period}", source.as_str()),
        }
    }

    /// SMA of close prices.
    pub fn close(period: usize) -> Self {
        Self::new(period, BarField::Close)
    }

    /// SMA of volume.
    pub fn volume(period: usize) -> Self {
        Self::new(period, BarField::Volume)
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let values: Vec<f64> = bars.iter().map(|b| b.field(self.source)).collect();
        rolling_mean(&values, self.period)
    }
}

/// Trailing mean over exactly `period` values ending at each index.
///
/// Each window is summed from scratch so the result equals the plain mean of
/// that window, with no accumulated drift from a running sum.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        if mean.is_finite() {
            result[i] = Some(mean);
        }
    }

    result
}
