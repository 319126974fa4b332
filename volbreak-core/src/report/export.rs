//! CSV serialization of the breakout table and the indicator-augmented series.
//!
//! Prices and percentages carry 2 decimals, volume is a plain integer, dates
//! are `YYYY-MM-DD`, and missing values are empty fields. Output is a
//! deterministic function of the input: identical analyses produce identical
//! bytes.

use thiserror::Error;

use super::format::{format_plain, PRICE_DECIMALS};
use super::table::{BreakoutReport, ColumnSet};
use crate::engine::Analysis;

/// Failures while producing CSV text.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn num(value: f64) -> String {
    format_plain(value, PRICE_DECIMALS)
}

fn opt_num(value: Option<f64>) -> String {
    value.map(num).unwrap_or_default()
}

fn opt_date(value: Option<chrono::NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let data = wtr
        .into_inner()
        .map_err(|e| ReportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Export the breakout table: header row plus one row per breakout event.
pub fn to_csv_string(report: &BreakoutReport, columns: ColumnSet) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(report.headers(columns))?;

    for r in &report.rows {
        let mut record = vec![
            r.date.to_string(),
            num(r.close),
            num(r.high),
            num(r.low),
            num(r.open),
            r.volume.to_string(),
            opt_num(r.price_change_pct),
            opt_num(r.forward_return_pct),
        ];
        if columns == ColumnSet::WithIndicators {
            let ind = &r.indicators;
            record.extend([
                r.holding_end_date.to_string(),
                opt_date(r.exit_date),
                opt_num(ind.avg_volume),
                opt_num(ind.ma_fast),
                opt_num(ind.ma_slow),
                opt_num(ind.rsi),
                opt_num(ind.bb_mid),
                opt_num(ind.bb_upper),
                opt_num(ind.bb_lower),
            ]);
        }
        wtr.write_record(&record)?;
    }

    finish(wtr)
}

/// Export every bar with its indicator and flag columns, for chart overlays
/// (candles, moving averages, bands, volume bars, breakout markers).
pub fn series_to_csv_string(analysis: &Analysis) -> Result<String, ReportError> {
    let c = &analysis.config.indicators;
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Date".to_string(),
        "Open".to_string(),
        "High".to_string(),
        "Low".to_string(),
        "Close".to_string(),
        "Volume".to_string(),
        format!("AvgVolume{}", c.volume_window),
        format!("MA{}", c.ma_fast),
        format!("MA{}", c.ma_slow),
        format!("RSI{}", c.rsi_period),
        format!("BBMid{}", c.bollinger_period),
        format!("BBUpper{}", c.bollinger_period),
        format!("BBLower{}", c.bollinger_period),
        "PriceChange".to_string(),
        "VolumeBreakout".to_string(),
        "PriceBreakout".to_string(),
        "Breakout".to_string(),
    ])?;

    let rows = analysis
        .series
        .bars()
        .iter()
        .zip(&analysis.indicators)
        .zip(&analysis.flags);
    for ((bar, ind), flags) in rows {
        wtr.write_record([
            bar.date.to_string(),
            num(bar.open),
            num(bar.high),
            num(bar.low),
            num(bar.close),
            bar.volume.to_string(),
            opt_num(ind.avg_volume),
            opt_num(ind.ma_fast),
            opt_num(ind.ma_slow),
            opt_num(ind.rsi),
            opt_num(ind.bb_mid),
            opt_num(ind.bb_upper),
            opt_num(ind.bb_lower),
            opt_num(flags.price_change_pct),
            flags.volume_breakout.to_string(),
            flags.price_breakout.to_string(),
            flags.breakout.to_string(),
        ])?;
    }

    finish(wtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakoutConfig;
    use crate::domain::{Bar, PriceSeries};
    use crate::engine::analyze;
    use chrono::NaiveDate;

    /// Quiet weekdays with a breakout on Friday 2024-02-02. The series stops
    /// on Monday 2024-02-05, so the 10-day end date has no bar.
    fn friday_breakout() -> Analysis {
        let mut bars = Vec::new();
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while bars.len() < 26 {
            if chrono::Datelike::weekday(&date).number_from_monday() <= 5 {
                let i = bars.len();
                let (close, volume) = if i == 24 { (1_050.0, 9_000) } else { (1_000.0, 1_000) };
                bars.push(Bar {
                    date,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume,
                });
            }
            date = date.succ_opt().unwrap();
        }
        let series = PriceSeries::new("TEST", bars).unwrap();
        analyze(series, &BreakoutConfig::default()).unwrap()
    }

    #[test]
    fn csv_has_header_and_one_row_per_event() {
        let analysis = friday_breakout();
        let report = BreakoutReport::build(&analysis);
        let csv = to_csv_string(&report, ColumnSet::Basic).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Close,High,Low,Open,Volume,PriceChange,Return");
        assert_eq!(lines.len(), 1 + report.rows.len());
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn null_return_is_empty_field() {
        let analysis = friday_breakout();
        let report = BreakoutReport::build(&analysis);
        let csv = to_csv_string(&report, ColumnSet::Basic).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2024-02-02,1050.00,1050.00,1050.00,1050.00,9000,5.00,");
    }

    #[test]
    fn indicator_columns_are_appended() {
        let analysis = friday_breakout();
        let report = BreakoutReport::build(&analysis);
        let csv = to_csv_string(&report, ColumnSet::WithIndicators).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.ends_with("HoldingEnd,ExitDate,AvgVolume20,MA50,MA200,RSI14,BBMid20,BBUpper20,BBLower20"));

        let fields: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(fields.len(), 17);
        assert_eq!(fields[8], "2024-02-12");
        assert_eq!(fields[9], "");
        // MA50 / MA200 still warming up
        assert_eq!(fields[11], "");
        assert_eq!(fields[12], "");
    }

    #[test]
    fn series_csv_has_every_bar() {
        let analysis = friday_breakout();
        let csv = series_to_csv_string(&analysis).unwrap();
        assert_eq!(csv.lines().count(), 1 + analysis.series.len());
        let breakout_rows = csv.lines().filter(|l| l.ends_with(",true,true,true")).count();
        assert_eq!(breakout_rows, 1);
    }

    #[test]
    fn export_is_deterministic() {
        let a = friday_breakout();
        let b = friday_breakout();
        let ra = to_csv_string(&BreakoutReport::build(&a), ColumnSet::WithIndicators).unwrap();
        let rb = to_csv_string(&BreakoutReport::build(&b), ColumnSet::WithIndicators).unwrap();
        assert_eq!(ra, rb);
    }
}
