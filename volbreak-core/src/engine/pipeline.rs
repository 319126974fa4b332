//! Full analysis pipeline: indicators → classification → forward returns.
//!
//! Pure and synchronous. The only failure is an invalid configuration; every
//! numeric edge case (short series, empty series, zero denominators) resolves
//! to `None` or a `false` flag inside the stages.

use tracing::debug;

use super::classifier::{classify, BreakoutFlags};
use super::forward_return::{measure_forward_returns, BreakoutEvent};
use super::indicator_frame::{IndicatorRow, IndicatorSet};
use crate::config::{BreakoutConfig, ConfigError};
use crate::domain::PriceSeries;

/// Everything the engine derives from one series and one configuration.
///
/// `indicators` and `flags` are aligned row-for-row with `series`.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: PriceSeries,
    pub indicators: Vec<IndicatorRow>,
    pub flags: Vec<BreakoutFlags>,
    pub events: Vec<BreakoutEvent>,
    pub config: BreakoutConfig,
    /// Rows before this index have at least one indicator in warm-up.
    pub warmup_bars: usize,
}

impl Analysis {
    pub fn breakout_count(&self) -> usize {
        self.events.len()
    }
}

/// Run the analysis over `series`.
pub fn analyze(series: PriceSeries, config: &BreakoutConfig) -> Result<Analysis, ConfigError> {
    config.validate()?;

    let set = IndicatorSet::from_config(&config.indicators);
    let indicators = set.compute(series.bars());
    let flags = classify(series.bars(), &indicators, &config.thresholds());
    let events = measure_forward_returns(
        &series,
        &flags,
        config.holding_period_days,
        config.miss_policy,
    );

    debug!(
        symbol = series.symbol(),
        bars = series.len(),
        breakouts = events.len(),
        measured = events.iter().filter(|e| e.is_measured()).count(),
        "analysis complete"
    );

    Ok(Analysis {
        warmup_bars: set.warmup(),
        series,
        indicators,
        flags,
        events,
        config: config.clone(),
    })
}
