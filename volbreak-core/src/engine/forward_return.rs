//! Forward returns for breakout days.
//!
//! The holding period is counted in calendar days. The end date is looked up
//! in the series' date index; when it falls on a weekend, holiday, or past the
//! end of the data, `MissPolicy` decides what happens. The default (`Exact`)
//! reports no return at all rather than an approximate one.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::classifier::BreakoutFlags;
use crate::domain::PriceSeries;

/// What to do when `trigger_date + holding_period_days` is not a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Only an exact date match counts; otherwise the return is `None`.
    #[default]
    Exact,
    /// Use the first trading day on or after the end date.
    NextTradingDay,
    /// Use the last trading day on or before the end date, as long as it is
    /// after the trigger date.
    PreviousTradingDay,
}

impl MissPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MissPolicy::Exact => "exact",
            MissPolicy::NextTradingDay => "next_trading_day",
            MissPolicy::PreviousTradingDay => "previous_trading_day",
        }
    }
}

impl std::str::FromStr for MissPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "exact" => Ok(MissPolicy::Exact),
            "next_trading_day" | "next" => Ok(MissPolicy::NextTradingDay),
            "previous_trading_day" | "previous" | "prev" => Ok(MissPolicy::PreviousTradingDay),
            other => Err(format!(
                "unknown miss policy '{other}'. Valid: exact, next_trading_day, previous_trading_day"
            )),
        }
    }
}

/// One breakout day and the return measured after it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakoutEvent {
    /// Row of the trigger day in the series.
    pub bar_index: usize,
    pub trigger_date: NaiveDate,
    pub close_at_trigger: f64,
    /// `trigger_date + holding_period_days`, whether or not it traded.
    pub holding_end_date: NaiveDate,
    /// Trading day actually used for the exit close.
    pub exit_date: Option<NaiveDate>,
    pub close_at_end: Option<f64>,
    pub forward_return_pct: Option<f64>,
}

impl BreakoutEvent {
    pub fn is_measured(&self) -> bool {
        self.forward_return_pct.is_some()
    }
}

/// Calendar end date of a holding period. Saturates at `NaiveDate::MAX`,
/// which never matches a bar.
pub fn holding_end_date(trigger_date: NaiveDate, holding_period_days: u32) -> NaiveDate {
    trigger_date
        .checked_add_days(Days::new(u64::from(holding_period_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Percentage return from `start` to `end`. `None` for a zero start price.
pub fn forward_return_pct(start: f64, end: f64) -> Option<f64> {
    if start == 0.0 {
        return None;
    }
    Some((end - start) / start * 100.0)
}

/// Resolve the exit row for a trigger at `trigger_index`.
fn resolve_exit(
    series: &PriceSeries,
    trigger_index: usize,
    end_date: NaiveDate,
    policy: MissPolicy,
) -> Option<usize> {
    if let Some(i) = series.index_of(end_date) {
        return Some(i);
    }
    match policy {
        MissPolicy::Exact => None,
        MissPolicy::NextTradingDay => series.first_on_or_after(end_date),
        MissPolicy::PreviousTradingDay => series
            .last_on_or_before(end_date)
            .filter(|&i| i > trigger_index),
    }
}

/// Build a `BreakoutEvent` for the bar at `trigger_index`.
pub fn measure_event(
    series: &PriceSeries,
    trigger_index: usize,
    holding_period_days: u32,
    policy: MissPolicy,
) -> Option<BreakoutEvent> {
    let trigger = series.get(trigger_index)?;
    let end_date = holding_end_date(trigger.date, holding_period_days);
    let exit = resolve_exit(series, trigger_index, end_date, policy).and_then(|i| series.get(i));

    let close_at_end = exit.map(|b| b.close);
    let forward_return_pct = close_at_end.and_then(|end| forward_return_pct(trigger.close, end));

    Some(BreakoutEvent {
        bar_index: trigger_index,
        trigger_date: trigger.date,
        close_at_trigger: trigger.close,
        holding_end_date: end_date,
        exit_date: exit.map(|b| b.date),
        close_at_end,
        forward_return_pct,
    })
}

/// Measure forward returns for every row flagged as a breakout.
///
/// `flags` must be aligned with the series. Events come back in date order.
pub fn measure_forward_returns(
    series: &PriceSeries,
    flags: &[BreakoutFlags],
    holding_period_days: u32,
    policy: MissPolicy,
) -> Vec<BreakoutEvent> {
    debug_assert_eq!(series.len(), flags.len());
    flags
        .iter()
        .enumerate()
        .filter(|(_, f)| f.breakout)
        .filter_map(|(i, _)| measure_event(series, i, holding_period_days, policy))
        .collect()
}
