//! Volbreak Core: volume/price breakout detection and forward-return analytics.
//!
//! This crate contains the analysis engine and its data seam:
//! - Domain types (bars, date-indexed price series)
//! - Rolling indicators (average volume, moving averages, RSI, Bollinger Bands)
//! - Per-day breakout classification against volume and price thresholds
//! - Forward returns over a calendar-day holding period
//! - Report assembly, display formatting and CSV export
//! - Data providers (Yahoo Finance, local CSV, synthetic) and canonicalization
//!
//! The engine (`engine`, `indicators`, `report`) is pure: no I/O, no global
//! state, identical output for identical input.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod report;

pub use config::{BreakoutConfig, ConfigError, IndicatorConfig, Thresholds};
pub use domain::{Bar, BarField, PriceSeries, SeriesError};
pub use engine::{analyze, Analysis, BreakoutEvent, BreakoutFlags, IndicatorRow, MissPolicy};
pub use report::{BreakoutReport, ColumnSet, ReportError, ReportSummary, ReturnTone};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine types can move between threads, so a host
    /// can serve several analyses concurrently.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<BreakoutConfig>();
        require_sync::<BreakoutConfig>();
        require_send::<Analysis>();
        require_sync::<Analysis>();
        require_send::<BreakoutEvent>();
        require_sync::<BreakoutEvent>();
        require_send::<BreakoutReport>();
        require_sync::<BreakoutReport>();
        require_send::<engine::IndicatorSet>();
        require_sync::<engine::IndicatorSet>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }

    /// Architecture contract: indicators see only bars.
    ///
    /// `compute()` takes `&[Bar]` and nothing else, so no indicator can read
    /// breakout flags or returns computed downstream.
    #[test]
    fn indicator_trait_sees_only_bars() {
        fn _check_trait_object_builds(
            ind: &dyn indicators::Indicator,
            bars: &[Bar],
        ) -> Vec<Option<f64>> {
            ind.compute(bars)
        }
    }
}
