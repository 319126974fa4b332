//! Canonicalization: raw provider rows → clean, strictly ordered bars.
//!
//! Sorts by date, keeps the first row for a duplicated date, and drops rows
//! that fail `Bar::is_sane` (missing or negative prices, high < low). The
//! output always satisfies the `PriceSeries` invariants.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::provider::RawBar;
use crate::domain::Bar;

/// What canonicalization changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalizeReport {
    pub input_rows: usize,
    pub out_of_range: usize,
    pub duplicates_dropped: usize,
    pub invalid_dropped: usize,
    /// Kept rows that report zero volume.
    pub zero_volume_days: usize,
}

impl CanonicalizeReport {
    pub fn dropped(&self) -> usize {
        self.out_of_range + self.duplicates_dropped + self.invalid_dropped
    }
}

/// Canonicalize `raw`, keeping only dates inside `range` when given
/// (inclusive on both ends).
pub fn canonicalize(
    mut raw: Vec<RawBar>,
    range: Option<(NaiveDate, NaiveDate)>,
) -> (Vec<Bar>, CanonicalizeReport) {
    let mut report = CanonicalizeReport {
        input_rows: raw.len(),
        ..Default::default()
    };

    // Stable sort keeps provider order among equal dates, so "first" is
    // well defined.
    raw.sort_by_key(|b| b.date);

    let mut bars: Vec<Bar> = Vec::with_capacity(raw.len());
    for r in raw {
        if let Some((start, end)) = range {
            if r.date < start || r.date > end {
                report.out_of_range += 1;
                continue;
            }
        }
        if bars.last().is_some_and(|last| last.date == r.date) {
            report.duplicates_dropped += 1;
            continue;
        }
        let bar = Bar {
            date: r.date,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        };
        if !bar.is_sane() {
            report.invalid_dropped += 1;
            continue;
        }
        if bar.volume == 0 {
            report.zero_volume_days += 1;
        }
        bars.push(bar);
    }

    (bars, report)
}
