//! Breakout report assembly.
//!
//! Joins each breakout event with its trigger-day bar, indicator row and
//! price change into a typed `ReportRow`. Styling is left to the renderer;
//! the only presentation data attached here is the `ReturnTone` hint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format::{format_optional, format_price, format_volume};
use crate::config::IndicatorConfig;
use crate::engine::{Analysis, IndicatorRow};

/// Display hint for the return cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnTone {
    /// Return above zero.
    Positive,
    /// Return at or below zero.
    Negative,
    /// No measurable return.
    Neutral,
}

impl ReturnTone {
    pub fn from_return(ret: Option<f64>) -> Self {
        match ret {
            Some(r) if r > 0.0 => ReturnTone::Positive,
            Some(_) => ReturnTone::Negative,
            None => ReturnTone::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReturnTone::Positive => "positive",
            ReturnTone::Negative => "negative",
            ReturnTone::Neutral => "neutral",
        }
    }
}

/// Which columns an export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSet {
    /// Date, OHLCV, price change and return.
    #[default]
    Basic,
    /// Basic plus holding dates and every indicator field.
    WithIndicators,
}

/// One breakout day, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub price_change_pct: Option<f64>,
    pub indicators: IndicatorRow,
    pub holding_end_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub close_at_end: Option<f64>,
    pub forward_return_pct: Option<f64>,
    pub tone: ReturnTone,
}

/// Descriptive statistics over the breakout rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub breakout_count: usize,
    /// Rows with a measurable forward return.
    pub measured_count: usize,
    pub mean_return_pct: Option<f64>,
    pub best_return_pct: Option<f64>,
    pub worst_return_pct: Option<f64>,
    /// Fraction of measured rows with a positive return.
    pub positive_share: Option<f64>,
}

/// The breakout table for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutReport {
    pub symbol: String,
    pub holding_period_days: u32,
    pub indicator_config: IndicatorConfig,
    pub rows: Vec<ReportRow>,
}

impl BreakoutReport {
    /// Assemble the report from a finished analysis.
    pub fn build(analysis: &Analysis) -> Self {
        let bars = analysis.series.bars();
        let rows = analysis
            .events
            .iter()
            .map(|event| {
                let i = event.bar_index;
                let bar = &bars[i];
                ReportRow {
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    price_change_pct: analysis.flags[i].price_change_pct,
                    indicators: analysis.indicators[i],
                    holding_end_date: event.holding_end_date,
                    exit_date: event.exit_date,
                    close_at_end: event.close_at_end,
                    forward_return_pct: event.forward_return_pct,
                    tone: ReturnTone::from_return(event.forward_return_pct),
                }
            })
            .collect();

        Self {
            symbol: analysis.series.symbol().to_string(),
            holding_period_days: analysis.config.holding_period_days,
            indicator_config: analysis.config.indicators.clone(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let returns: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|r| r.forward_return_pct)
            .collect();
        let measured = returns.len();
        let (mean, best, worst, positive_share) = if measured == 0 {
            (None, None, None, None)
        } else {
            let n = measured as f64;
            (
                Some(returns.iter().sum::<f64>() / n),
                returns.iter().copied().reduce(f64::max),
                returns.iter().copied().reduce(f64::min),
                Some(returns.iter().filter(|r| **r > 0.0).count() as f64 / n),
            )
        };

        ReportSummary {
            breakout_count: self.rows.len(),
            measured_count: measured,
            mean_return_pct: mean,
            best_return_pct: best,
            worst_return_pct: worst,
            positive_share,
        }
    }

    /// Column headers for `columns`.
    pub fn headers(&self, columns: ColumnSet) -> Vec<String> {
        let mut headers: Vec<String> = [
            "Date",
            "Close",
            "High",
            "Low",
            "Open",
            "Volume",
            "PriceChange",
            "Return",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();

        if columns == ColumnSet::WithIndicators {
            let c = &self.indicator_config;
            headers.extend([
                "HoldingEnd".to_string(),
                "ExitDate".to_string(),
                format!("AvgVolume{}", c.volume_window),
                format!("MA{}", c.ma_fast),
                format!("MA{}", c.ma_slow),
                format!("RSI{}", c.rsi_period),
                format!("BBMid{}", c.bollinger_period),
                format!("BBUpper{}", c.bollinger_period),
                format!("BBLower{}", c.bollinger_period),
            ]);
        }
        headers
    }
}

/// Render the report as an aligned text table with display formatting.
///
/// The return column carries a trailing tone marker (`+`, `-`, or blank).
pub fn render_text(report: &BreakoutReport) -> String {
    let headers = report.headers(ColumnSet::Basic);
    let body: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| {
            let marker = match r.tone {
                ReturnTone::Positive => " +",
                ReturnTone::Negative => " -",
                ReturnTone::Neutral => "",
            };
            vec![
                r.date.format("%Y-%m-%d").to_string(),
                format_price(r.close),
                format_price(r.high),
                format_price(r.low),
                format_price(r.open),
                format_volume(r.volume as f64),
                format_optional(r.price_change_pct, format_price),
                format!(
                    "{}{marker}",
                    format_optional(r.forward_return_pct, format_price)
                ),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:>w$}"))
        .collect();
    out.push_str(&header_line.join("  "));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in &body {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:>w$}"))
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }
    out
}
