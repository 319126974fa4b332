//! Local CSV import.
//!
//! Reads daily bars from a CSV file with a header row. Column names are
//! matched case-insensitively (`Date`, `Open`, `High`, `Low`, `Close`,
//! `Volume`); other columns such as `Adj Close` are ignored. Empty price cells
//! become NaN and are dropped later by canonicalization.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use super::provider::{DataError, RawBar};

const REQUIRED: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Parse bars from any reader.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<RawBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| DataError::InvalidCsv {
        line: 1,
        reason: e.to_string(),
    })?;
    let names: Vec<String> = headers.iter().map(|h| h.to_ascii_lowercase()).collect();

    let mut cols = [0usize; 6];
    for (slot, required) in cols.iter_mut().zip(REQUIRED) {
        *slot = names
            .iter()
            .position(|n| n == required)
            .ok_or_else(|| DataError::InvalidCsv {
                line: 1,
                reason: format!("missing column '{required}'"),
            })?;
    }
    let [date_col, open_col, high_col, low_col, close_col, volume_col] = cols;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DataError::InvalidCsv {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| record.get(i).unwrap_or("");
        let invalid = |reason: String| DataError::InvalidCsv { line, reason };

        let date = parse_date(field(date_col))
            .ok_or_else(|| invalid(format!("invalid date '{}'", field(date_col))))?;
        let price = |i: usize| parse_price(field(i)).map_err(invalid);

        bars.push(RawBar {
            date,
            open: price(open_col)?,
            high: price(high_col)?,
            low: price(low_col)?,
            close: price(close_col)?,
            volume: parse_volume(field(volume_col)).map_err(invalid)?,
        });
    }

    Ok(bars)
}

/// Parse bars from a file on disk.
pub fn load_bars_csv(path: &Path) -> Result<Vec<RawBar>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    read_bars_csv(file)
}

/// `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_price(s: &str) -> Result<f64, String> {
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.replace(',', "")
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{s}'"))
}

fn parse_volume(s: &str) -> Result<u64, String> {
    if s.is_empty() {
        return Ok(0);
    }
    let v = parse_price(s)?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("invalid volume '{s}'"));
    }
    Ok(v.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_yahoo_style_export() {
        let csv = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,187.15,188.44,183.89,185.64,184.94,82488700
2024-01-03,184.22,185.88,183.43,184.25,183.55,58414500
";
        let bars = read_bars_csv(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 185.64);
        assert_eq!(bars[1].volume, 58_414_500);
    }

    #[test]
    fn accepts_lowercase_reordered_columns_and_timestamps() {
        let csv = "\
volume,close,low,high,open,date
1000.0,10.5,10,11,10.2,2024-01-02 00:00:00
";
        let bars = read_bars_csv(csv.as_bytes()).unwrap();
        assert_eq!(bars[0].open, 10.2);
        assert_eq!(bars[0].volume, 1000);
    }

    #[test]
    fn empty_price_is_nan() {
        let csv = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,,10\n";
        let bars = read_bars_csv(csv.as_bytes()).unwrap();
        assert!(bars[0].close.is_nan());
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "date,open,high,low,close\n2024-01-02,1,2,0.5,1.5\n";
        let err = read_bars_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing column 'volume'"));
    }

    #[test]
    fn bad_date_reports_line() {
        let csv = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,10\nnot-a-date,1,2,0.5,1.5,10\n";
        match read_bars_csv(csv.as_bytes()).unwrap_err() {
            DataError::InvalidCsv { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("not-a-date"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_volume_is_rejected() {
        let csv = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,-10\n";
        assert!(read_bars_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_bars_csv(Path::new("/nonexistent/bars.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
