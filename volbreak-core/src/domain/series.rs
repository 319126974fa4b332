//! PriceSeries: an ordered, date-indexed sequence of bars for one symbol.
//!
//! Dates are strictly increasing and unique. Calendar gaps (weekends,
//! holidays) are allowed and are simply absent from the index. The series is
//! immutable once built; every analysis stage reads it through `&self`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use super::bar::Bar;

/// Construction failures for `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("dates out of order at row {index}: {date} follows {previous}")]
    Unsorted {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate date {date} at row {index}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("invalid bar on {date}: prices must be finite, non-negative and high >= low")]
    InvalidBar { date: NaiveDate },
}

/// Daily OHLCV series for a single symbol with an explicit date index.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
    index: BTreeMap<NaiveDate, usize>,
}

impl PriceSeries {
    /// Build a series, checking ordering, uniqueness and bar sanity.
    ///
    /// An empty `bars` vector is valid and yields an empty series.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let mut index = BTreeMap::new();
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::InvalidBar { date: bar.date });
            }
            if i > 0 {
                let previous = bars[i - 1].date;
                if bar.date == previous {
                    return Err(SeriesError::DuplicateDate {
                        index: i,
                        date: bar.date,
                    });
                }
                if bar.date < previous {
                    return Err(SeriesError::Unsorted {
                        index: i,
                        previous,
                        date: bar.date,
                    });
                }
            }
            index.insert(bar.date, i);
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
            index,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Row index of an exact trading date, if that date is in the series.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.index.get(&date).copied()
    }

    /// First row dated on or after `date`.
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        self.index.range(date..).next().map(|(_, &i)| i)
    }

    /// Last row dated on or before `date`.
    pub fn last_on_or_before(&self, date: NaiveDate) -> Option<usize> {
        self.index.range(..=date).next_back().map(|(_, &i)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn bar(date: NaiveDate, close: f64) -> Bar {
        Bar {
            date,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn empty_series_is_valid() {
        let s = PriceSeries::new("SPY", vec![]).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.first_date(), None);
        assert_eq!(s.index_of(d(2024, 1, 2)), None);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new("SPY", vec![bar(d(2024, 1, 2), 10.0), bar(d(2024, 1, 2), 11.0)])
            .unwrap_err();
        assert_eq!(
            err,
            SeriesError::DuplicateDate {
                index: 1,
                date: d(2024, 1, 2)
            }
        );
    }

    #[test]
    fn rejects_unsorted_dates() {
        let err = PriceSeries::new("SPY", vec![bar(d(2024, 1, 3), 10.0), bar(d(2024, 1, 2), 11.0)])
            .unwrap_err();
        assert!(matches!(err, SeriesError::Unsorted { index: 1, .. }));
    }

    #[test]
    fn rejects_void_bar() {
        let err = PriceSeries::new("SPY", vec![bar(d(2024, 1, 2), f64::NAN)]).unwrap_err();
        assert_eq!(err, SeriesError::InvalidBar { date: d(2024, 1, 2) });
    }

    #[test]
    fn lookups_respect_gaps() {
        // Fri 2024-01-05, Mon 2024-01-08
        let s = PriceSeries::new(
            "SPY",
            vec![bar(d(2024, 1, 5), 10.0), bar(d(2024, 1, 8), 11.0)],
        )
        .unwrap();

        assert_eq!(s.index_of(d(2024, 1, 5)), Some(0));
        assert_eq!(s.index_of(d(2024, 1, 6)), None);
        assert_eq!(s.first_on_or_after(d(2024, 1, 6)), Some(1));
        assert_eq!(s.last_on_or_before(d(2024, 1, 7)), Some(0));
        assert_eq!(s.first_on_or_after(d(2024, 1, 9)), None);
        assert_eq!(s.last_on_or_before(d(2024, 1, 4)), None);
    }
}
