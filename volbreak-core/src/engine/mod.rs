//! Analytics engine: indicator precomputation, breakout classification and
//! forward-return measurement.
//!
//! Stages run strictly in order and never modify the output of an earlier
//! stage:
//!
//! 1. `indicator_frame`: rolling indicators, one row per bar
//! 2. `classifier`: per-bar volume/price breakout flags
//! 3. `forward_return`: calendar-day holding period returns per breakout
//! 4. `pipeline`: wires the three together

pub mod classifier;
pub mod forward_return;
pub mod indicator_frame;
pub mod pipeline;

pub use classifier::{classify, classify_bar, price_change_pct, BreakoutFlags};
pub use forward_return::{
    holding_end_date, measure_event, measure_forward_returns, BreakoutEvent, MissPolicy,
};
pub use indicator_frame::{compute_indicators, IndicatorRow, IndicatorSet};
pub use pipeline::{analyze, Analysis};
