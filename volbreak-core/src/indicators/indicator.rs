//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, nullable numeric series out.
//! They run once over the whole series before classification.

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce an output series of the same
/// length. Rows without enough trailing history are `None` (warm-up), never a
/// sentinel value.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_close_50", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading rows that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<Option<f64>>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}
