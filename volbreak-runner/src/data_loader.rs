//! Series loading and data resolution for the runner.
//!
//! Implements the fallback policy for one ticker:
//! 1. If an input CSV is given → read it (no fallback on failure)
//! 2. If not offline and a provider is available → fetch
//! 3. If `--synthetic` → generate synthetic bars (tagged)
//! 4. Otherwise → fail with a clear error
//!
//! Whatever the source, the bars are canonicalized and clipped to the
//! requested range before the engine sees them.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use volbreak_core::data::{
    canonicalize, generate_synthetic_bars, load_bars_csv, CanonicalizeReport, DataError,
    DataProvider, DataSource, RawBar,
};
use volbreak_core::fingerprint::dataset_hash;
use volbreak_core::{PriceSeries, SeriesError};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data for '{symbol}' without network access (use --input or --synthetic)")]
    NoDataOffline { symbol: String },

    #[error("error fetching data for '{symbol}': {reason}")]
    FetchFailed { symbol: String, reason: String },

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// First date to keep (inclusive).
    pub start: NaiveDate,
    /// Last date to keep (inclusive).
    pub end: NaiveDate,
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate synthetic bars when real data is unavailable.
    pub synthetic: bool,
    /// Read bars from this CSV instead of a provider.
    pub input: Option<PathBuf>,
}

/// A loaded series plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub source: DataSource,
    pub canonicalize: CanonicalizeReport,
    /// BLAKE3 over every bar (see `volbreak_core::fingerprint`).
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

/// Load bars for `ticker`, following the fallback policy above.
pub fn load_series(
    ticker: &str,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    if opts.start > opts.end {
        return Err(LoadError::InvalidRange {
            start: opts.start,
            end: opts.end,
        });
    }

    let (raw, source) = resolve_raw(ticker, provider, opts)?;
    let (bars, report) = canonicalize(raw, Some((opts.start, opts.end)));

    if report.duplicates_dropped + report.invalid_dropped > 0 {
        warn!(
            symbol = ticker,
            duplicates = report.duplicates_dropped,
            invalid = report.invalid_dropped,
            "dropped bars during canonicalization"
        );
    }
    if bars.is_empty() {
        warn!(symbol = ticker, start = %opts.start, end = %opts.end, "no bars in requested range");
    }

    let series = PriceSeries::new(ticker, bars)?;
    let hash = dataset_hash(&series);

    info!(
        symbol = ticker,
        source = source.as_str(),
        bars = series.len(),
        first = ?series.first_date(),
        last = ?series.last_date(),
        "series loaded"
    );

    Ok(LoadedSeries {
        series,
        source,
        canonicalize: report,
        dataset_hash: hash,
        has_synthetic: source == DataSource::Synthetic,
    })
}

fn resolve_raw(
    ticker: &str,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<(Vec<RawBar>, DataSource), LoadError> {
    // Step 1: explicit input file
    if let Some(path) = &opts.input {
        let bars = load_bars_csv(path)?;
        return Ok((bars, DataSource::CsvImport));
    }

    // Step 2: provider fetch
    let mut failure: Option<String> = None;
    if !opts.offline {
        match provider {
            Some(prov) if prov.is_available() => {
                match prov.fetch(ticker, opts.start, opts.end) {
                    Ok(fetched) => return Ok((fetched.bars, fetched.source)),
                    Err(e) => {
                        warn!(symbol = ticker, provider = prov.name(), error = %e, "fetch failed");
                        failure = Some(e.to_string());
                    }
                }
            }
            Some(prov) => {
                failure = Some(format!("provider '{}' is unavailable", prov.name()));
            }
            None => failure = Some("no data provider configured".into()),
        }
    }

    // Step 3: synthetic fallback
    if opts.synthetic {
        warn!(
            symbol = ticker,
            "generating synthetic data; results will be tagged as synthetic"
        );
        let bars = generate_synthetic_bars(ticker, opts.start, opts.end);
        return Ok((bars, DataSource::Synthetic));
    }

    // Step 4: fail
    match failure {
        Some(reason) => Err(LoadError::FetchFailed {
            symbol: ticker.to_string(),
            reason,
        }),
        None => Err(LoadError::NoDataOffline {
            symbol: ticker.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volbreak_core::data::FetchResult;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn opts(offline: bool, synthetic: bool) -> LoadOptions {
        LoadOptions {
            start: d(2024, 1, 1),
            end: d(2024, 3, 31),
            offline,
            synthetic,
            input: None,
        }
    }

    struct FailingProvider;

    impl DataProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, symbol: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn offline_without_input_fails() {
        let err = load_series("SPY", None, &opts(true, false)).unwrap_err();
        assert!(matches!(err, LoadError::NoDataOffline { .. }));
    }

    #[test]
    fn fetch_failure_is_reported() {
        let err = load_series("NOPE", Some(&FailingProvider), &opts(false, false)).unwrap_err();
        assert!(matches!(err, LoadError::FetchFailed { .. }));
        assert!(err.to_string().contains("symbol not found"));
    }

    #[test]
    fn synthetic_fallback_after_fetch_failure() {
        let loaded = load_series("FAKE", Some(&FailingProvider), &opts(false, true)).unwrap();
        assert!(loaded.has_synthetic);
        assert_eq!(loaded.source, DataSource::Synthetic);
        assert!(!loaded.series.is_empty());
    }

    #[test]
    fn offline_synthetic_skips_provider() {
        let loaded = load_series("FAKE", Some(&FailingProvider), &opts(true, true)).unwrap();
        assert_eq!(loaded.source, DataSource::Synthetic);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut o = opts(true, true);
        o.start = d(2024, 5, 1);
        assert!(matches!(
            load_series("SPY", None, &o),
            Err(LoadError::InvalidRange { .. })
        ));
    }

    #[test]
    fn dataset_hash_is_deterministic() {
        let a = load_series("SPY", None, &opts(true, true)).unwrap();
        let b = load_series("SPY", None, &opts(true, true)).unwrap();
        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert_eq!(a.series.bars(), b.series.bars());
    }
}
