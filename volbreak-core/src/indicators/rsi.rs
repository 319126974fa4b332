//! Relative Strength Index (RSI).
//!
//! Simple-mean variant: average gain and average loss are plain trailing
//! means of the last `period` close-to-close changes (no Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (the first bar has no change).
//! Edge case: avg_loss == 0 → RSI = 100, including a completely flat window.

use super::indicator::Indicator;
use super::sma::rolling_mean;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period + 1 {
            return result;
        }

        // Changes start at bar 1; gains[k] / losses[k] belong to bar k + 1.
        let (gains, losses): (Vec<f64>, Vec<f64>) = bars
            .windows(2)
            .map(|w| {
                let delta = w[1].close - w[0].close;
                (delta.max(0.0), (-delta).max(0.0))
            })
            .unzip();

        let avg_gains = rolling_mean(&gains, self.period);
        let avg_losses = rolling_mean(&losses, self.period);

        for (k, (gain, loss)) in avg_gains.into_iter().zip(avg_losses).enumerate() {
            if let (Some(g), Some(l)) = (gain, loss) {
                result[k + 1] = Some(compute_rsi(g, l));
            }
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_eq!(result[2], None);
        for v in &result[3..] {
            assert_eq!(*v, Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3].unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_window_is_100() {
        let bars = make_bars(&[50.0; 6]);
        let result = Rsi::new(3).compute(&bars);
        assert_eq!(result[5], Some(100.0));
    }

    #[test]
    fn rsi_mixed_matches_hand_calculation() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // RSI[3]: gains 0.34, losses 0.73 → 100 - 100/(1 + 0.34/0.73)
        // RSI[4]: window (-0.25, -0.48, +0.72) → gains 0.72, losses 0.73
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&bars);

        assert!(result[..3].iter().all(Option::is_none));
        let expected_3 = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result[3].unwrap(), expected_3, 1e-9);
        let expected_4 = 100.0 - 100.0 / (1.0 + 0.72 / 0.73);
        assert_approx(result[4].unwrap(), expected_4, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, v) in result.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_too_few_bars() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(Rsi::new(3).compute(&bars).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
