//! Breakout classification.
//!
//! A day is a breakout when its volume exceeds the trailing average by the
//! volume threshold AND its close-to-close change exceeds the price threshold.
//! Each row is classified on its own; no row's flags depend on another row's
//! classification.

use serde::{Deserialize, Serialize};

use super::indicator_frame::IndicatorRow;
use crate::config::Thresholds;
use crate::domain::Bar;

/// Per-day classification result.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakoutFlags {
    /// Day-over-day close change in percent. `None` on the first row and when
    /// the previous close is zero.
    pub price_change_pct: Option<f64>,
    pub volume_breakout: bool,
    pub price_breakout: bool,
    pub breakout: bool,
}

/// Percentage change from `prev_close` to `close`.
///
/// A zero or non-finite previous close has no defined percentage change.
pub fn price_change_pct(prev_close: f64, close: f64) -> Option<f64> {
    if prev_close == 0.0 || !prev_close.is_finite() || !close.is_finite() {
        return None;
    }
    Some((close - prev_close) / prev_close * 100.0)
}

/// Classify a single day.
///
/// `prev_close` is `None` for the first bar of the series.
pub fn classify_bar(
    bar: &Bar,
    prev_close: Option<f64>,
    avg_volume: Option<f64>,
    thresholds: &Thresholds,
) -> BreakoutFlags {
    let change = prev_close.and_then(|prev| price_change_pct(prev, bar.close));

    let volume_breakout = avg_volume
        .map(|avg| bar.volume as f64 > avg * (thresholds.volume_threshold_pct / 100.0))
        .unwrap_or(false);

    let price_breakout = change
        .map(|pct| pct > thresholds.price_change_threshold_pct)
        .unwrap_or(false);

    BreakoutFlags {
        price_change_pct: change,
        volume_breakout,
        price_breakout,
        breakout: volume_breakout && price_breakout,
    }
}

/// Classify every bar. `indicators` must be aligned with `bars`.
pub fn classify(
    bars: &[Bar],
    indicators: &[IndicatorRow],
    thresholds: &Thresholds,
) -> Vec<BreakoutFlags> {
    debug_assert_eq!(bars.len(), indicators.len());
    bars.iter()
        .zip(indicators)
        .enumerate()
        .map(|(i, (bar, row))| {
            let prev_close = i.checked_sub(1).map(|p| bars[p].close);
            classify_bar(bar, prev_close, row.avg_volume, thresholds)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn bar(close: f64, volume: u64) -> Bar {
        let mut b = make_bars(&[close])[0];
        b.volume = volume;
        b
    }

    #[test]
    fn price_change_basic() {
        assert_approx(price_change_pct(100.0, 105.0).unwrap(), 5.0, 1e-12);
        assert_approx(price_change_pct(100.0, 98.0).unwrap(), -2.0, 1e-12);
    }

    #[test]
    fn price_change_zero_previous_close_is_none() {
        assert_eq!(price_change_pct(0.0, 5.0), None);
    }

    #[test]
    fn both_conditions_required() {
        let t = Thresholds::default();

        // volume 3x average, +5% → breakout
        let flags = classify_bar(&bar(105.0, 3000), Some(100.0), Some(1000.0), &t);
        assert!(flags.volume_breakout && flags.price_breakout && flags.breakout);

        // volume 3x average, +1% → volume only
        let flags = classify_bar(&bar(101.0, 3000), Some(100.0), Some(1000.0), &t);
        assert!(flags.volume_breakout);
        assert!(!flags.price_breakout);
        assert!(!flags.breakout);

        // normal volume, +5% → price only
        let flags = classify_bar(&bar(105.0, 1000), Some(100.0), Some(1000.0), &t);
        assert!(!flags.volume_breakout);
        assert!(flags.price_breakout);
        assert!(!flags.breakout);
    }

    #[test]
    fn thresholds_are_strict() {
        let t = Thresholds::default();
        // exactly 2x volume and exactly +2% → neither flag
        let flags = classify_bar(&bar(102.0, 2000), Some(100.0), Some(1000.0), &t);
        assert!(!flags.volume_breakout);
        assert!(!flags.price_breakout);
    }

    #[test]
    fn missing_average_volume_is_never_a_breakout() {
        let t = Thresholds::default();
        let flags = classify_bar(&bar(200.0, 1_000_000), Some(100.0), None, &t);
        assert!(!flags.volume_breakout);
        assert!(!flags.breakout);
    }

    #[test]
    fn first_row_has_no_price_change() {
        let t = Thresholds::default();
        let flags = classify_bar(&bar(200.0, 1_000_000), None, Some(1.0), &t);
        assert_eq!(flags.price_change_pct, None);
        assert!(flags.volume_breakout);
        assert!(!flags.breakout);
    }

    #[test]
    fn classify_uses_previous_row_close() {
        let bars = make_bars(&[100.0, 110.0]);
        let rows: Vec<IndicatorRow> = bars
            .iter()
            .map(|b| IndicatorRow {
                date: b.date,
                avg_volume: Some(100.0),
                ma_fast: None,
                ma_slow: None,
                rsi: None,
                bb_mid: None,
                bb_upper: None,
                bb_lower: None,
            })
            .collect();
        let flags = classify(&bars, &rows, &Thresholds::default());
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].price_change_pct, None);
        assert_approx(flags[1].price_change_pct.unwrap(), 10.0, 1e-12);
        // volume 1000 > 100 * 2
        assert!(flags[1].breakout);
    }
}
